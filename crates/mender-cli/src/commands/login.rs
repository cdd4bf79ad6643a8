//! The end-to-end login flow: find the username and password inputs, type
//! into them, press the login button, then optionally look for a marker in
//! the resulting page.

use crate::SessionOptions;
use anyhow::Result;
use mender_browser::{CdpProbe, normalize_url};
use std::time::Duration;

/// How long to let the page react to the submit before inspecting it
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

pub struct LoginArgs<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub url: Option<&'a str>,
    pub expect: Option<&'a str>,
    pub port: u16,
}

pub fn execute(options: &SessionOptions, args: LoginArgs<'_>) -> Result<()> {
    let mut session = options.open()?;
    let mut probe = CdpProbe::connect(args.port)?;

    if let Some(url) = args.url {
        probe.goto(&normalize_url(url)?)?;
    }

    let username = session.resolve("username", &mut probe)?;
    probe.fill(&username.element, args.username)?;

    let password = session.resolve("password", &mut probe)?;
    probe.fill(&password.element, args.password)?;

    let button = session.resolve("login_button", &mut probe)?;
    probe.click(&button.element)?;

    probe.pause(SETTLE_DELAY);

    if let Some(expected) = args.expect {
        let content = probe.content()?;
        if content_matches(&content, expected) {
            println!("✅ UI interaction successful");
        } else {
            println!("❌ Expected text not found on page: {}", expected);
        }
    }

    session.commit()?;
    Ok(())
}

fn content_matches(content: &str, expected: &str) -> bool {
    content.contains(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_matches_substring() {
        let page = "<div class=\"error\">خطایی در ارتباط با سرور</div>";
        assert!(content_matches(page, "خطایی در ارتباط با سرور"));
        assert!(!content_matches(page, "Welcome back"));
    }
}
