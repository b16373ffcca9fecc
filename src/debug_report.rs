use rogerian::ReplyVerbose;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_reply(input: &str, reply: &ReplyVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    print_header(input, &palette);

    println!("\n{}", palette.paint("━━━ Match ━━━", ansi::GRAY));
    let details = &reply.details;
    match (&details.rule, &details.pattern) {
        (Some(rule), Some(pattern)) => {
            println!(
                "  {} {} {} {}",
                palette.paint(format!("rule #{rule}"), ansi::BLUE),
                palette.dim("│"),
                palette.paint(pattern, ansi::CYAN),
                palette.dim(format!("(template #{})", details.template.unwrap_or_default())),
            );
        }
        _ => {
            println!("{}", palette.dim("  No response rule matched; fallback reply used"));
        }
    }
    println!("  {} {}", palette.dim("rules scanned:"), palette.paint(details.rules_scanned.to_string(), ansi::YELLOW));

    if !details.captures.is_empty() {
        println!("\n{}", palette.paint("━━━ Groups ━━━", ansi::GRAY));
        for (idx, raw) in details.captures.iter().enumerate() {
            let processed = details.processed.get(idx).map(String::as_str).unwrap_or("");
            println!(
                "  {} {} {} {}",
                palette.paint(format!("${}", idx + 1), ansi::GRAY),
                palette.paint(format!("{raw:?}"), ansi::YELLOW),
                palette.dim("→"),
                palette.paint(format!("{processed:?}"), ansi::GREEN),
            );
        }
        println!("  {} {}", palette.dim("substitutions:"), palette.paint(details.substitutions.to_string(), ansi::YELLOW));
    }

    print_footer(&reply.text, &format!("{:?}", reply.elapsed), &palette);
}

pub fn print_simple(input: &str, text: &str, color: bool) {
    let palette = ansi::Palette::new(color);
    print_header(input, &palette);
    println!("\n{}", palette.paint("━━━ Match ━━━", ansi::GRAY));
    println!("{}", palette.dim("  Answered by the built-in simple matcher"));
    print_footer(text, "-", &palette);
}

fn print_header(input: &str, palette: &ansi::Palette) {
    println!("\n{}", palette.bold(palette.paint(format!("💬 Input: \"{}\"", input), ansi::CYAN)));
}

fn print_footer(text: &str, elapsed: &str, palette: &ansi::Palette) {
    println!("\n{}", palette.paint("━━━ Reply ━━━", ansi::GRAY));
    println!("  {}", palette.bold(palette.paint(text, ansi::GREEN)));
    println!("\n  {} {}", palette.dim("elapsed:"), palette.dim(elapsed));
    println!();
}
