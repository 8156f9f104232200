//! Console progress for the interactive run.

use std::io::Write;
use std::sync::Arc;

use crate::auth::{AuthEvent, AuthEventSink};
use crate::export::ExportOutcome;
use crate::fetch::{FetchEvent, FetchEventSink};

pub fn auth_printer(open_browser: bool) -> AuthEventSink {
    Arc::new(move |event: AuthEvent| match event {
        AuthEvent::VerificationRequired {
            verification_uri,
            user_code,
        } => {
            println!("\n🔐 LOGIN REQUIRED");
            if open_browser {
                println!("The browser will open shortly. If not, go to: {verification_uri}");
            } else {
                println!("Go to: {verification_uri}");
            }
            println!("Enter this code: \x1b[1m{user_code}\x1b[0m");
            print_inline("\n⏳ Waiting for authorization...");
        }
        AuthEvent::Pending => print_inline("."),
        AuthEvent::SlowDown { .. } => print_inline("(slow)"),
        AuthEvent::Authorized => println!("\n✅ Authentication successful!"),
    })
}

pub fn fetch_started() {
    print_inline("\n📥 Downloading repository list...");
}

pub fn fetch_printer() -> FetchEventSink {
    Arc::new(|event: FetchEvent| match event {
        FetchEvent::PageFetched { .. } => print_inline("."),
        FetchEvent::Completed { total } => {
            println!("\n📦 Total repositories found: {total}")
        }
    })
}

pub fn export_finished(outcome: &ExportOutcome) {
    match outcome {
        ExportOutcome::Skipped => println!("ℹ️  No repositories to export"),
        ExportOutcome::Written { path, .. } => println!("💾 File saved: {}", path.display()),
        ExportOutcome::Failed { reason, .. } => eprintln!("❌ Save error: {reason}"),
    }
}

fn print_inline(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}
