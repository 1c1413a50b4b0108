#[must_use]
pub fn get_suggestions(msg: &str) -> Vec<String> {
    let mut suggestions = Vec::new();
    let msg_lower = msg.to_lowercase();

    if msg_lower.contains("conflict") || msg_lower.contains("could not apply") {
        suggestions.push(
            "Resolve the conflicts, stage them with git add, then choose Continue (r)".to_string(),
        );
        suggestions.push("Or drop the commit with Skip (s), or give up with Abort (a)".to_string());
    }

    if msg_lower.contains("unstaged changes")
        || msg_lower.contains("uncommitted changes")
        || msg_lower.contains("would be overwritten")
    {
        suggestions.push("Commit or stash your changes first: git stash".to_string());
    }

    if msg_lower.contains("rebase-merge") && msg_lower.contains("already") {
        suggestions.push(
            "Another rebase is in progress; press g to refresh and use the control menu"
                .to_string(),
        );
    }

    if msg_lower.contains("no rebase in progress") {
        suggestions.push("Nothing to control; press g to refresh the menu".to_string());
    }

    if msg_lower.contains("not a git repository") {
        suggestions.push("Run grebase inside a git working tree or pass --repo".to_string());
    }

    if msg_lower.contains("waiting on its editor") {
        suggestions.push("Finish or abort the open todo editor first".to_string());
    }

    suggestions
}
