//! Static glyph-width tables for text measurement.
//!
//! Widths are in em units (multiply by font size). Layout only needs widths
//! to center labels and wrap phrases, so a per-class table is used instead
//! of reading real glyph advances. Every backend measures through these
//! tables, so page breaks are identical for PDF and raster output.

/// Which width table applies to a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricClass {
    /// Typical humanist/grotesque sans or serif.
    Proportional,
    /// Fixed-pitch faces (Courier and friends).
    Monospace,
}

impl MetricClass {
    /// Guess the class from a family name.
    #[must_use]
    pub fn for_family(family: &str) -> Self {
        let lower = family.to_ascii_lowercase();
        if lower.contains("mono") || lower.contains("courier") {
            Self::Monospace
        } else {
            Self::Proportional
        }
    }
}

const MONO_EM: f32 = 0.6;

/// Width of one character in em units.
#[must_use]
pub fn char_width_em(c: char, class: MetricClass) -> f32 {
    if class == MetricClass::Monospace {
        return MONO_EM;
    }
    match c {
        ' ' => 0.28,
        'i' | 'j' | 'l' | '.' | ',' | '\'' | '!' | '|' | ':' | ';' => 0.26,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '-' => 0.36,
        'm' | 'w' => 0.83,
        'M' | 'W' => 0.9,
        '0'..='9' | '_' => 0.56,
        'a'..='z' => 0.52,
        'A'..='Z' => 0.68,
        _ => 0.6,
    }
}

/// Rendered width of a string at a font size.
#[must_use]
pub fn measure(text: &str, size: f32, class: MetricClass) -> f32 {
    text.chars().map(|c| char_width_em(c, class)).sum::<f32>() * size
}

/// Greedy word wrap to `max_width`. Words longer than a line get their own line.
#[must_use]
pub fn wrap(text: &str, max_width: f32, size: f32, class: MetricClass) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate, size, class) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_scales_with_size() {
        let small = measure("Puzzle", 10.0, MetricClass::Proportional);
        let large = measure("Puzzle", 20.0, MetricClass::Proportional);
        assert!((large - small * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_monospace_is_uniform() {
        let a = measure("iiii", 10.0, MetricClass::Monospace);
        let b = measure("WWWW", 10.0, MetricClass::Monospace);
        assert!((a - b).abs() < f32::EPSILON);
    }

    #[test]
    fn test_class_from_family() {
        assert_eq!(MetricClass::for_family("Courier New"), MetricClass::Monospace);
        assert_eq!(MetricClass::for_family("Arial"), MetricClass::Proportional);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap(text, 80.0, 12.0, MetricClass::Proportional);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(
                measure(line, 12.0, MetricClass::Proportional) <= 80.0 || !line.contains(' '),
                "line too wide: {line}"
            );
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap("   ", 100.0, 12.0, MetricClass::Proportional).is_empty());
    }
}
