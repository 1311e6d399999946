//! One-shot messages carried across a redirect in a short-lived cookie.
//!
//! The cookie stores a short code such as `created.tarefa`; the message text
//! is looked up when the next page is rendered.
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use gerenciador_core::RecordKind;

use crate::web::PERSISTENCE_ERROR_MESSAGE;

const FLASH_COOKIE: &str = "flash";

/// Visual weight of a message shown at the top of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    /// Returns the CSS class suffix used by the templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Success => "success",
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
        }
    }
}

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn class(&self) -> &'static str {
        self.level.as_str()
    }
}

/// Outcomes reported to the user on the page after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Created(RecordKind),
    Updated(RecordKind),
    Completed(RecordKind),
    AlreadyCompleted(RecordKind),
    Deleted(RecordKind),
    PersistenceFailed,
}

impl Flash {
    fn code(&self) -> String {
        match self {
            Flash::Created(kind) => format!("created.{}", kind.slug()),
            Flash::Updated(kind) => format!("updated.{}", kind.slug()),
            Flash::Completed(kind) => format!("completed.{}", kind.slug()),
            Flash::AlreadyCompleted(kind) => format!("already_completed.{}", kind.slug()),
            Flash::Deleted(kind) => format!("deleted.{}", kind.slug()),
            Flash::PersistenceFailed => "persistence_failed".to_string(),
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        if code == "persistence_failed" {
            return Some(Flash::PersistenceFailed);
        }
        let (action, slug) = code.split_once('.')?;
        let kind = [RecordKind::Task, RecordKind::Warranty]
            .into_iter()
            .find(|kind| kind.slug() == slug)?;
        match action {
            "created" => Some(Flash::Created(kind)),
            "updated" => Some(Flash::Updated(kind)),
            "completed" => Some(Flash::Completed(kind)),
            "already_completed" => Some(Flash::AlreadyCompleted(kind)),
            "deleted" => Some(Flash::Deleted(kind)),
            _ => None,
        }
    }

    pub fn alert(&self) -> Alert {
        match self {
            Flash::Created(kind) => Alert::new(
                AlertLevel::Success,
                format!("{} adicionada com sucesso!", kind.label()),
            ),
            Flash::Updated(kind) => Alert::new(
                AlertLevel::Success,
                format!("{} atualizada com sucesso!", kind.label()),
            ),
            Flash::Completed(kind) => Alert::new(
                AlertLevel::Success,
                format!("{} marcada como concluída!", kind.label()),
            ),
            Flash::AlreadyCompleted(kind) => Alert::new(
                AlertLevel::Info,
                format!("{} já estava concluída.", kind.label()),
            ),
            Flash::Deleted(kind) => Alert::new(
                AlertLevel::Success,
                format!("{} excluída com sucesso.", kind.label()),
            ),
            Flash::PersistenceFailed => Alert::new(AlertLevel::Danger, PERSISTENCE_ERROR_MESSAGE),
        }
    }
}

/// Stores `flash` to be shown on the next page.
pub fn set_flash(jar: CookieJar, flash: Flash) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, flash.code()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(5))
        .path("/")
        .build();
    jar.add(cookie)
}

/// Removes the pending flash, if any, and returns its alert.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Alert>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let alert = Flash::from_code(cookie.value()).map(|flash| flash.alert());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, alert)
}
