//! Heading placeholders. URLs go into `\href` untouched; all display text is escaped.

use std::collections::HashMap;

use crate::escape::escape_latex;
use crate::models::resume::{AdditionalLink, ProfileLink};
use crate::models::Heading;

pub const FULL_NAME: &str = "FULL_NAME";
pub const ADDRESS_LINE: &str = "ADDRESS_LINE";
pub const PHONE_NUMBER: &str = "PHONE_NUMBER";
pub const EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
pub const LINKEDIN_URL: &str = "LINKEDIN_URL";
pub const LINKEDIN_USERNAME: &str = "LINKEDIN_USERNAME";
pub const GITHUB_URL: &str = "GITHUB_URL";
pub const GITHUB_USERNAME: &str = "GITHUB_USERNAME";
pub const ADDITIONAL_LINKS: &str = "ADDITIONAL_LINKS";

/// Builds the value of every heading placeholder. Missing fields map to `""`.
pub fn heading_vars(heading: &Heading) -> HashMap<&'static str, String> {
    let (linkedin_url, linkedin_user) = profile(heading.linkedin.as_ref());
    let (github_url, github_user) = profile(heading.github.as_ref());

    HashMap::from([
        (FULL_NAME, escape_latex(&heading.full_name)),
        (ADDRESS_LINE, escape_latex(&heading.address)),
        (PHONE_NUMBER, escape_latex(&heading.phone)),
        (EMAIL_ADDRESS, escape_latex(&heading.email)),
        (LINKEDIN_URL, linkedin_url),
        (LINKEDIN_USERNAME, linkedin_user),
        (GITHUB_URL, github_url),
        (GITHUB_USERNAME, github_user),
        (ADDITIONAL_LINKS, additional_links(&heading.additional_links)),
    ])
}

fn profile(link: Option<&ProfileLink>) -> (String, String) {
    link.map(|l| (l.url.clone(), escape_latex(&l.username)))
        .unwrap_or_default()
}

/// Each link becomes `~` + an `\href` with an icon macro and underlined label.
fn additional_links(links: &[AdditionalLink]) -> String {
    links
        .iter()
        .map(|link| {
            format!(
                "~\n    \\href{{{}}}{{\\raisebox{{-0.2\\height}}\\{}\\ \\underline{{{}}}}}",
                link.url,
                link.icon,
                escape_latex(link.label())
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_vars_escape_text_but_not_urls() {
        let heading = Heading {
            full_name: "Jake_Ryan".into(),
            email: "jake@su.edu".into(),
            github: Some(ProfileLink {
                url: "https://github.com/jake_r".into(),
                username: "jake_r".into(),
            }),
            ..Default::default()
        };
        let vars = heading_vars(&heading);

        assert_eq!(vars[FULL_NAME], "Jake\\_Ryan");
        assert_eq!(vars[EMAIL_ADDRESS], "jake@su.edu");
        assert_eq!(vars[GITHUB_URL], "https://github.com/jake_r");
        assert_eq!(vars[GITHUB_USERNAME], "jake\\_r");
        assert_eq!(vars[LINKEDIN_URL], "");
        assert_eq!(vars[ADDITIONAL_LINKS], "");
    }

    #[test]
    fn test_additional_link_markup() {
        let heading = Heading {
            additional_links: vec![AdditionalLink {
                icon: "faGlobe".into(),
                url: "https://jake.dev".into(),
                display_text: None,
            }],
            ..Default::default()
        };
        assert_eq!(
            heading_vars(&heading)[ADDITIONAL_LINKS],
            "~\n    \\href{https://jake.dev}{\\raisebox{-0.2\\height}\\faGlobe\\ \\underline{https://jake.dev}}"
        );
    }
}
