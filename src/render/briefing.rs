//! Task-scoped briefing: only the pages relevant to one task.

use super::sanitize_text;
use crate::error::{Result, SitebriefError};
use crate::graph::{match_task, Graph, RelevanceSet};

/// Render the briefing for `task`.
///
/// With no relevant pages only the task header is emitted. When any matched
/// page requires authentication, the graph's default credentials are
/// appended; their absence is an error.
pub fn render_task_briefing(graph: &Graph, task: &str) -> Result<String> {
    let relevant = match_task(graph, task);
    let mut out = format!("# Task: {}\n", sanitize_text(task.trim()));

    if relevant.is_empty() {
        log::warn!("no pages matched the task; briefing carries no targeted context");
        return Ok(out);
    }

    out.push_str("\n## Relevant Pages\n");
    for (node, page) in relevant.pages() {
        out.push_str(&format!(
            "\n### {} ({})\n",
            sanitize_text(&node.name),
            sanitize_text(&page.route)
        ));
        if !node.description.is_empty() {
            out.push_str(&format!("{}\n", sanitize_text(&node.description)));
        }

        if let Some(flow) = &page.user_flow {
            if !flow.actions.is_empty() {
                out.push_str("Actions:\n");
                for action in &flow.actions {
                    out.push_str(&format!("- {}\n", sanitize_text(action)));
                }
            }
        }

        let mut selectors = node.selector_elements().peekable();
        if selectors.peek().is_some() {
            out.push_str("Elements:\n");
            for (element, selector) in selectors {
                out.push_str(&format!(
                    "- {}: {}\n",
                    sanitize_text(&element.description),
                    sanitize_text(selector)
                ));
            }
        }
    }

    if let Some(section) = auth_section(graph, &relevant)? {
        out.push('\n');
        out.push_str(&section);
    }
    Ok(out)
}

fn auth_section(graph: &Graph, relevant: &RelevanceSet<'_>) -> Result<Option<String>> {
    let protected: Vec<String> = relevant.protected().map(|node| node.id.clone()).collect();
    if protected.is_empty() {
        return Ok(None);
    }

    let creds = graph
        .authentication()
        .and_then(|auth| auth.default_credentials.as_ref())
        .ok_or(SitebriefError::MissingCredentials { pages: protected })?;

    let login_url = format!("{}/login", graph.metadata().base_url.trim_end_matches('/'));

    let mut out = String::from("## Authentication Required\n");
    out.push_str("Some of the pages above require a signed-in session. Log in first:\n");
    out.push_str(&format!("- Login URL: {}\n", sanitize_text(&login_url)));
    out.push_str(&format!("- Username: {}\n", sanitize_text(&creds.username)));
    out.push_str(&format!("- Password: {}\n", sanitize_text(&creds.password)));
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures;

    #[test]
    fn test_empty_task_only_header() {
        let text = render_task_briefing(&fixtures::storefront(), "").unwrap();
        assert_eq!(text, "# Task: \n");
        assert!(!text.contains("Relevant Pages"));
        assert!(!text.contains("Authentication Required"));
    }

    #[test]
    fn test_unmatched_task_only_header() {
        let text = render_task_briefing(&fixtures::storefront(), "qwxz").unwrap();
        assert_eq!(text, "# Task: qwxz\n");
    }

    #[test]
    fn test_public_match_has_no_auth_section() {
        let text = render_task_briefing(&fixtures::storefront(), "sign").unwrap();
        assert!(text.contains("## Relevant Pages\n\n### Login (/login)\nSign in page\n"));
        assert!(text.contains("Actions:\n- Enter credentials\n- Submit the form\n"));
        assert!(text.contains("Elements:\n- Email field: #email\n- Password field: #password\n"));
        assert!(!text.contains("Authentication Required"));
    }

    #[test]
    fn test_protected_match_appends_credentials() {
        let text = render_task_briefing(&fixtures::storefront(), "complete checkout").unwrap();
        assert!(text.contains("### Checkout (/checkout)"));
        assert!(text.contains("## Authentication Required\n"));
        // base URL trailing slash is trimmed
        assert!(text.contains("- Login URL: https://shop.example.com/login\n"));
        assert!(text.contains("- Username: test@example.com\n"));
        assert_eq!(text.matches("## Authentication Required").count(), 1);
    }

    #[test]
    fn test_missing_credentials_is_error() {
        let err = render_task_briefing(&fixtures::two_page(), "login").unwrap_err();
        match err {
            SitebriefError::MissingCredentials { pages } => assert_eq!(pages, vec!["login"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_briefing_is_deterministic() {
        let graph = fixtures::storefront();
        let a = render_task_briefing(&graph, "cart and account").unwrap();
        let b = render_task_briefing(&graph, "cart and account").unwrap();
        assert_eq!(a, b);
    }
}
