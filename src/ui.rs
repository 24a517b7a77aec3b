use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.len()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Action Lines
// ============================================================================

/// Sigil shown before an action verb
fn verb_sigil(verb: &str) -> &'static str {
    match verb {
        "create" => "+",
        "update" => "~",
        "delete" => "-",
        _ => "?",
    }
}

/// Render an action line without color, e.g. `+ create "ops"`
pub fn action_line(verb: &str, name: &str) -> String {
    format!("{} {verb} {name:?}", verb_sigil(verb))
}

/// Print an action line, color-coded by verb; `detail` is appended dimmed
pub fn action(verb: &str, name: &str, detail: &str) {
    let line = action_line(verb, name);
    let line = match verb_sigil(verb) {
        "+" => line.green(),
        "~" => line.yellow(),
        "-" => line.red(),
        _ => line.normal(),
    };
    if detail.is_empty() {
        println!("  {line}");
    } else {
        println!("  {line} {}", detail.dimmed());
    }
}

// ============================================================================
// Tests
// ============================================================================
