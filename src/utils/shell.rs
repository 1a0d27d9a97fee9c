/// Escape a value for use inside single quotes.
/// Replaces `'` with `'\''` (end quote, escaped quote, start quote).
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a single argument for display or shell execution.
/// - Empty strings become `''`
/// - Strings with shell metacharacters are wrapped in single quotes
/// - Embedded single quotes are escaped
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    // Characters that require quoting
    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~',
    ];

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", escape_single_quote_content(arg))
}

/// Quote and join a program and its arguments into one display string.
/// Used when echoing the exact command line a stage is about to run.
pub fn render_command_line(program: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(quote_arg(program));
    parts.extend(args.iter().map(|a| quote_arg(a)));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_arg_simple() {
        assert_eq!(quote_arg("pdflatex"), "pdflatex");
        assert_eq!(quote_arg("-interaction=nonstopmode"), "-interaction=nonstopmode");
    }

    #[test]
    fn quote_arg_with_spaces() {
        assert_eq!(quote_arg("my paper.tex"), "'my paper.tex'");
    }

    #[test]
    fn quote_arg_with_single_quote() {
        assert_eq!(quote_arg("it's.tex"), "'it'\\''s.tex'");
    }

    #[test]
    fn quote_arg_empty() {
        assert_eq!(quote_arg(""), "''");
    }

    #[test]
    fn render_command_line_quotes_each_part() {
        let args = vec!["-interaction=nonstopmode".to_string(), "my paper.tex".to_string()];
        assert_eq!(
            render_command_line("pdflatex", &args),
            "pdflatex -interaction=nonstopmode 'my paper.tex'"
        );
    }
}
