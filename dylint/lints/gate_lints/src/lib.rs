//! Custom lints for the introspection gate.
//!
//! The gate handles bearer credentials on every request. All diagnostic
//! output must go through `tracing` so that it lands in the host's
//! subscriber, carries the request span, and never prints a token to a
//! terminal.
//!
//! ## Implemented Lints
//!
//! - `STDOUT_MACROS`: Forbids `print!`, `println!`, `eprint!`, `eprintln!`
//!   and `dbg!` in library code.

#![feature(rustc_private)]
#![warn(unused_extern_crates)]

extern crate rustc_ast;
extern crate rustc_lint;
extern crate rustc_session;
extern crate rustc_span;

use rustc_ast::{Expr, ExprKind, MacCall};
use rustc_lint::{EarlyContext, EarlyLintPass, LintContext};
use rustc_session::{declare_lint_pass, declare_tool_lint};
use rustc_span::Span;

declare_tool_lint! {
    /// **What it does:** Forbids the standard output macros in library code.
    ///
    /// **Why is this bad?** Output written straight to stdout or stderr skips
    /// the host's `tracing` subscriber. It loses the `introspect` span
    /// (request id, context key) and is the usual way a raw token ends up
    /// in a log file.
    ///
    /// **Known problems:** `#[cfg(test)]` code is linted too.
    ///
    /// **Example:**
    /// ```rust,ignore
    /// // Bad
    /// println!("introspecting {}", token.expose_secret());
    /// dbg!(&result);
    ///
    /// // Good
    /// tracing::debug!(endpoint = %endpoint, "introspecting token");
    /// ```
    pub gate_lints::STDOUT_MACROS,
    Deny,
    "use of print!, println!, eprint!, eprintln!, or dbg!; use tracing instead"
}

declare_lint_pass!(StdoutMacros => [STDOUT_MACROS]);

impl EarlyLintPass for StdoutMacros {
    fn check_expr(&mut self, cx: &EarlyContext<'_>, expr: &Expr) {
        if let ExprKind::MacCall(mac) = &expr.kind {
            check_macro(cx, mac, expr.span);
        }
    }
}

/// Suggested `tracing` replacement for each forbidden macro.
fn replacement(name: &str) -> Option<&'static str> {
    match name {
        "print" | "println" => Some("tracing::info!"),
        "eprint" | "eprintln" => Some("tracing::warn!"),
        "dbg" => Some("tracing::debug!"),
        _ => None,
    }
}

fn check_macro(cx: &EarlyContext<'_>, mac: &MacCall, span: Span) {
    // Only bare or `std::` paths; a local macro named `println` is not ours.
    let segments = &mac.path.segments;
    let name = match segments.len() {
        1 => segments[0].ident.name.as_str(),
        2 if segments[0].ident.name.as_str() == "std" => segments[1].ident.name.as_str(),
        _ => return,
    };

    if let Some(suggestion) = replacement(name) {
        cx.span_lint(STDOUT_MACROS, span, |diag| {
            diag.help(format!("use `{suggestion}` so the output joins the request span"));
            diag.note(format!("`{name}!` writes outside the tracing subscriber and may expose credentials"));
        });
    }
}

#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub extern "C" fn register_lints(_sess: &rustc_session::Session, lint_store: &mut rustc_lint::LintStore) {
    lint_store.register_lints(&[&STDOUT_MACROS]);
    lint_store.register_early_pass(|| Box::new(StdoutMacros));
}

#[unsafe(no_mangle)]
pub fn dylint_version() -> *mut std::os::raw::c_char {
    std::ffi::CString::new(dylint_linting::DYLINT_VERSION)
        .expect("version string contains null byte")
        .into_raw()
}
