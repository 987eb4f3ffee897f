use wt_core::Section;

/// Renders a section tree depth-first as `#`-headed blocks, one per section.
pub fn format_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    write_sections(&mut out, sections, 0);
    out
}

fn write_sections(out: &mut String, sections: &[Section], depth: usize) {
    for section in sections {
        out.push_str(&"#".repeat(depth + 1));
        out.push(' ');
        out.push_str(&section.title);
        out.push_str("\n\n");
        out.push_str(&section.text);
        out.push_str("\n\n");
        write_sections(out, &section.sections, depth + 1);
    }
}

/// `== Title ==` → `(2, "Title")`
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim();
    let level = line.chars().take_while(|c| *c == '=').count();
    if level < 2 || !line.ends_with(&"=".repeat(level)) || line.len() <= level * 2 {
        return None;
    }
    let title = line[level..line.len() - level].trim();
    if title.is_empty() {
        return None;
    }
    Some((level, title))
}

/// Splits a plain-text extract (wiki section format) into its lead text and
/// section tree. Level-2 headings are top-level sections.
pub fn parse_extract(extract: &str) -> (String, Vec<Section>) {
    let mut summary = String::new();
    let mut roots: Vec<Section> = Vec::new();
    let mut stack: Vec<(usize, Section)> = Vec::new();

    for line in extract.lines() {
        if let Some((level, title)) = parse_heading(line) {
            let depth = level - 2;
            while stack.last().is_some_and(|(d, _)| *d >= depth) {
                close_top(&mut stack, &mut roots);
            }
            stack.push((depth, Section::new(title, "")));
            continue;
        }

        let text = match stack.last_mut() {
            Some((_, section)) => &mut section.text,
            None => &mut summary,
        };
        text.push_str(line);
        text.push('\n');
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    (summary.trim().to_string(), roots)
}

fn close_top(stack: &mut Vec<(usize, Section)>, roots: &mut Vec<Section>) {
    if let Some((_, mut section)) = stack.pop() {
        section.text = section.text.trim().to_string();
        match stack.last_mut() {
            Some((_, parent)) => parent.sections.push(section),
            None => roots.push(section),
        }
    }
}
