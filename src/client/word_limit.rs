//! 字数统计与字数限制

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// 预编译正则表达式
static RE_LIMIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d[\d,]*)\s*(words?|characters?|chars?)\b").unwrap()
});

/// 文书统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EssayStats {
    /// 以空白分隔的非空词数
    pub words: usize,
    /// Unicode 字符数
    pub characters: usize,
}

impl EssayStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}

/// 解析后的字数限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordLimit {
    Words(usize),
    Characters(usize),
}

impl WordLimit {
    /// 从 "500 words"、"3000 characters" 之类的文本中取第一个限制
    pub fn parse(text: &str) -> Option<Self> {
        let caps = RE_LIMIT.captures(text)?;
        let amount: usize = caps[1].replace(',', "").parse().ok()?;
        let unit = caps[2].to_lowercase();

        if unit.starts_with("word") {
            Some(WordLimit::Words(amount))
        } else {
            Some(WordLimit::Characters(amount))
        }
    }

    /// 文书是否超出限制
    pub fn is_exceeded(&self, stats: &EssayStats) -> bool {
        match self {
            WordLimit::Words(max) => stats.words > *max,
            WordLimit::Characters(max) => stats.characters > *max,
        }
    }
}

impl fmt::Display for WordLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordLimit::Words(n) => write!(f, "{} words", n),
            WordLimit::Characters(n) => write!(f, "{} characters", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats() {
        let stats = EssayStats::of("  I  built a\nrobot.\t ");
        assert_eq!(stats.words, 4);
        assert_eq!(stats.characters, 21);

        assert_eq!(EssayStats::of("  \n "), EssayStats { words: 0, characters: 4 });
        assert_eq!(EssayStats::of("эссе").characters, 4);
    }

    #[test]
    fn test_parse_limits() {
        assert_eq!(WordLimit::parse("500 words"), Some(WordLimit::Words(500)));
        assert_eq!(WordLimit::parse("max 650 Words."), Some(WordLimit::Words(650)));
        assert_eq!(
            WordLimit::parse("3,000 characters"),
            Some(WordLimit::Characters(3000))
        );
        assert_eq!(WordLimit::parse("1500chars"), Some(WordLimit::Characters(1500)));
        assert_eq!(
            WordLimit::parse("500 words or 3000 characters"),
            Some(WordLimit::Words(500))
        );
        assert_eq!(WordLimit::parse("one page"), None);
        assert_eq!(WordLimit::parse("500 wordsmiths"), None);
    }

    #[test]
    fn test_is_exceeded() {
        let stats = EssayStats::of("one two three");
        assert!(WordLimit::Words(2).is_exceeded(&stats));
        assert!(!WordLimit::Words(3).is_exceeded(&stats));
        assert!(!WordLimit::Characters(13).is_exceeded(&stats));
        assert!(WordLimit::Characters(12).is_exceeded(&stats));
    }
}
