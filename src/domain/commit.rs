use regex::Regex;

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    /// Non-empty body lines following the header, footers included
    pub body: Vec<String>,
    pub is_breaking_change: bool,
    /// Text of a `BREAKING CHANGE:` footer when one is present
    pub breaking_note: Option<String>,
}

const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

impl ParsedCommit {
    /// Parse a commit message according to conventional commits
    ///
    /// Supports `type(scope)!: description` with optional scope and marker.
    /// Anything else is treated as a `chore` whose description is the first line.
    pub fn parse(message: &str) -> Self {
        let mut lines = message.lines();
        let header = lines.next().unwrap_or_default().trim();

        let body: Vec<String> = lines
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let breaking_note = body.iter().find_map(|line| {
            BREAKING_FOOTERS
                .iter()
                .find_map(|footer| line.strip_prefix(footer))
                .map(|note| note.trim().to_string())
        });

        if let Some(captures) =
            Regex::new(r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^)]*)\))?(?P<bang>!)?:\s*(?P<subject>.+)$")
                .ok()
                .and_then(|re| re.captures(header))
        {
            let r#type = captures
                .name("type")
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();
            let scope = captures
                .name("scope")
                .map(|m| m.as_str().trim().to_string())
                .filter(|scope| !scope.is_empty());
            let has_exclamation = captures.name("bang").is_some();
            let description = captures
                .name("subject")
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            return ParsedCommit {
                r#type,
                scope,
                description,
                body,
                is_breaking_change: has_exclamation || breaking_note.is_some(),
                breaking_note,
            };
        }

        // Default: non-conventional commit
        ParsedCommit {
            r#type: "chore".to_string(),
            scope: None,
            description: header.to_string(),
            body,
            is_breaking_change: breaking_note.is_some(),
            breaking_note,
        }
    }
}
