//! The page routing table: a static mapping from `(method, path)` to a
//! named view, standing in for the original dispatcher. Unmatched requests
//! resolve to the fixed 404 page.

use clap::ValueEnum;
use serde::Serialize;

/// HTTP methods the table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Get,
    Post,
}

/// A resolved page: the template to render and its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub template: &'static str,
    pub title: &'static str,
    pub status: u16,
}

const NOT_FOUND: Page = Page {
    template: "pages/404.html.twig",
    title: "404 - Page Not Found",
    status: 404,
};

/// The public routes. The logout handler redirects home in the original
/// app; with redirects out of scope it resolves to the landing page.
const ROUTES: &[(Method, &str, Page)] = &[
    (
        Method::Get,
        "/",
        Page {
            template: "pages/landing.html.twig",
            title: "Triket - Ticket Management System",
            status: 200,
        },
    ),
    (
        Method::Get,
        "/auth/login",
        Page {
            template: "pages/login.html.twig",
            title: "Login - Triket",
            status: 200,
        },
    ),
    (
        Method::Get,
        "/auth/signup",
        Page {
            template: "pages/signup.html.twig",
            title: "Sign Up - Triket",
            status: 200,
        },
    ),
    (
        Method::Get,
        "/auth/logout",
        Page {
            template: "pages/landing.html.twig",
            title: "Triket - Ticket Management System",
            status: 200,
        },
    ),
    (
        Method::Get,
        "/dashboard",
        Page {
            template: "pages/dashboard.html.twig",
            title: "Dashboard - Triket",
            status: 200,
        },
    ),
    (
        Method::Get,
        "/tickets",
        Page {
            template: "pages/tickets.html.twig",
            title: "Tickets - Triket",
            status: 200,
        },
    ),
];

/// Resolve a request to a page. Trailing slashes (except on the root path)
/// are ignored, as the original dispatcher strips them before lookup.
#[must_use]
pub fn resolve(method: Method, path: &str) -> Page {
    let normalized = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    ROUTES
        .iter()
        .find(|(m, p, _)| *m == method && *p == normalized)
        .map_or(NOT_FOUND, |(_, _, page)| *page)
}
