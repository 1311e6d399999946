//! sea-orm entities for the `tarefa` and `garantia` tables.
pub mod garantia;
pub mod tarefa;
