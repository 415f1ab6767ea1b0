//
// dependency/format.rs
//
// Serialization of block sequences back into region text
//

/// One quoted path per line, separated by `,\n`, with a trailing newline.
///
/// An empty list renders as the empty string.
pub fn join_paths(paths: &[String], quote: char) -> String {
    if paths.is_empty() {
        return String::new();
    }
    let mut out = paths
        .iter()
        .map(|p| format!("{quote}{p}{quote}"))
        .collect::<Vec<_>>()
        .join(",\n");
    out.push('\n');
    out
}

/// Join names with `", "`, breaking lines so none runs past `width` columns.
///
/// Breaks only ever replace the space of a `", "` separator, so the comma
/// stays at the end of the previous line. A name longer than `width` is
/// never split; it just gets a line of its own. `width` counts from the
/// column the list starts at, not from the start of the line.
pub fn wrap_names(names: &[String], width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, name) in names.iter().enumerate() {
        let piece = if i + 1 < names.len() {
            format!("{},", name)
        } else {
            name.clone()
        };

        if current.is_empty() {
            current = piece;
            continue;
        }

        let joined_width = current.chars().count() + 1 + piece.chars().count();
        if joined_width > width {
            lines.push(std::mem::take(&mut current));
            current = piece;
        } else {
            current.push(' ');
            current.push_str(&piece);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}
