use serde::{Deserialize, Deserializer};

/// One entry of the series search response:
///
/// ```json
/// [{"id": "401", "label": "Canardo (Une enquête de l'inspecteur)",
///   "value": "Canardo (Une enquête de l'inspecteur)", "desc": "skin/flags/France.png"}]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    /// Flag image path; unused.
    #[serde(default)]
    pub desc: String,
}

impl SearchHit {
    pub fn display_title(&self) -> &str {
        if self.label.is_empty() {
            &self.value
        } else {
            &self.label
        }
    }
}

/// Parse a search response body. An empty body means no hits.
pub fn parse_search_response(body: &str) -> Result<Vec<SearchHit>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"[
            {"id": "74809", "label": "Canardo (Uma investigação do inspector)",
             "value": "Canardo (Uma investigação do inspector)", "desc": "skin/flags/Portugal.png"},
            {"id": 401, "label": "", "value": "Canardo (Une enquête de l'inspecteur)"}
        ]"#;
        let hits = parse_search_response(body).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "74809");
        assert_eq!(hits[1].id, "401");
        assert_eq!(hits[1].display_title(), "Canardo (Une enquête de l'inspecteur)");
    }

    #[test]
    fn test_empty_search_response() {
        assert!(parse_search_response("").unwrap().is_empty());
        assert!(parse_search_response("[]").unwrap().is_empty());
        assert!(parse_search_response("<html>").is_err());
    }
}
