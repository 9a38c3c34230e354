//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered into the fixed `#alert-container` element via htmx's
//! response targets, so any endpoint can surface a transient notification
//! without a full page reload.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A transient notification shown to the user.
#[derive(Debug, Clone)]
pub enum Alert {
    /// A green alert confirming an action succeeded.
    Success {
        message: String,
        details: String,
    },
    /// A red alert explaining that an action failed.
    Error {
        message: String,
        details: String,
    },
}

impl Alert {
    /// Create a new success alert.
    pub fn success(message: &str, details: &str) -> Self {
        Self::Success {
            message: message.to_string(),
            details: details.to_string(),
        }
    }

    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_string(),
            details: details.to_string(),
        }
    }

    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "flex items-start p-4 mb-4 rounded-lg border shadow-lg \
                text-green-800 border-green-300 bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "flex items-start p-4 mb-4 rounded-lg border shadow-lg \
                text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                details,
            ),
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    div class="text-sm"
                    {
                        span class="font-semibold block" { (message) }

                        @if !details.is_empty() {
                            span { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 p-1.5 rounded-lg focus:ring-2 inline-flex h-8 w-8 cursor-pointer"
                        aria-label="Close"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "✕"
                    }
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
