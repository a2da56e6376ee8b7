use chrono::Utc;

/// `<YYYY-MM-DD>__<kind>_<short-uuid>`, e.g. `2024-07-15__out_3f2a9c1e`.
pub fn new_artifact_id(kind: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d").to_string();
    let short = short_id();
    format!("{date}__{kind}_{short}")
}

fn short_id() -> String {
    let id = uuid::Uuid::new_v4().to_string();
    match id.split('-').next() {
        Some(part) if !part.is_empty() => part.to_string(),
        _ => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_ids_are_dated_and_unique() {
        let first = new_artifact_id("out");
        let second = new_artifact_id("out");
        assert_ne!(first, second);
        let (date, rest) = first.split_once("__").expect("separator");
        assert_eq!(date.len(), 10);
        assert!(rest.starts_with("out_"));
        assert_eq!(rest.len(), "out_".len() + 8);
    }
}
