//! Static fallback replies used when no remote provider answers.
//!
//! Each [`FallbackCategory`] owns an ordered list of in-character phrases.
//! Phrases are handed out round-robin per category so repeated questions
//! do not get the exact same answer twice in a row.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Appended to a fallback reply once remote providers have been disabled
/// after repeated failures.
pub const DISABLED_NOTICE: &str =
    "(ตอนนี้ Kafra ใช้โหมดตอบกลับอัตโนมัติชั่วคราว เพราะเชื่อมต่อระบบ AI ไม่ได้หลายครั้งติดกันค่ะ)";

/// Prefixed to a fallback reply when a request is already in flight.
pub const BUSY_NOTICE: &str = "Kafra กำลังตอบคำถามก่อนหน้าอยู่ค่ะ รอสักครู่นะคะ";

/// Reply category chosen by the pattern matcher.
///
/// Variants are declared in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackCategory {
    Greeting,
    Help,
    Blog,
    Coding,
    Thanks,
    Goodbye,
    Default,
}

impl FallbackCategory {
    pub const ALL: [FallbackCategory; 7] = [
        FallbackCategory::Greeting,
        FallbackCategory::Help,
        FallbackCategory::Blog,
        FallbackCategory::Coding,
        FallbackCategory::Thanks,
        FallbackCategory::Goodbye,
        FallbackCategory::Default,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FallbackCategory::Greeting => "greeting",
            FallbackCategory::Help => "help",
            FallbackCategory::Blog => "blog",
            FallbackCategory::Coding => "coding",
            FallbackCategory::Thanks => "thanks",
            FallbackCategory::Goodbye => "goodbye",
            FallbackCategory::Default => "default",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FallbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FallbackCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FallbackCategory::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| format!("invalid fallback category: '{s}'"))
    }
}

const GREETING: &[&str] = &[
    "สวัสดีค่ะ! Kafra ยินดีต้อนรับสู่ hh. นะคะ วันนี้ให้ช่วยอะไรดีคะ?",
    "หวัดดีค่ะ~ มีอะไรให้ Kafra ช่วยเรื่องบล็อกหรือโค้ดไหมคะ?",
    "ยินดีที่ได้พบกันค่ะ! ถามเรื่องบทความหรือการเขียนโปรแกรมได้เลยนะคะ",
];

const HELP: &[&str] = &[
    "Kafra ช่วยแนะนำบทความ อธิบายวิธีใช้งานบล็อก และตอบคำถามเรื่องโค้ดเบื้องต้นได้ค่ะ",
    "ลองถามเรื่องการเขียนโพสต์ การติดตามผู้เขียน หรือปัญหาโค้ดที่เจออยู่ได้เลยค่ะ",
];

const BLOG: &[&str] = &[
    "อยากเขียนโพสต์ใหม่ กดปุ่ม \"เขียนบทความ\" ที่มุมขวาบนได้เลยค่ะ",
    "บทความล่าสุดอยู่ที่หน้าแรกนะคะ กดถูกใจหรือบันทึกไว้อ่านทีหลังก็ได้ค่ะ",
    "ติดตามผู้เขียนที่ชอบไว้ แล้วบทความใหม่ของเขาจะขึ้นในฟีดของคุณค่ะ",
];

const CODING: &[&str] = &[
    "เรื่องโค้ดลองแนบข้อความ error และส่วนของโค้ดที่เกี่ยวข้องมาด้วยนะคะ จะช่วยได้ตรงจุดขึ้นค่ะ",
    "ในบล็อกมีบทความสอนเขียนโปรแกรมหลายเรื่องเลยค่ะ ลองค้นด้วยชื่อภาษาที่สนใจดูนะคะ",
];

const THANKS: &[&str] = &[
    "ยินดีค่ะ! ถ้ามีอะไรเพิ่มเติมเรียก Kafra ได้เสมอนะคะ",
    "ด้วยความยินดีค่ะ ขอให้สนุกกับการอ่านนะคะ",
];

const GOODBYE: &[&str] = &[
    "บายค่ะ! แล้วแวะมาอ่านบทความใหม่ ๆ อีกนะคะ",
    "แล้วพบกันใหม่ค่ะ ขอให้เป็นวันที่ดีนะคะ",
];

const DEFAULT: &[&str] = &[
    "ขอโทษค่ะ Kafra ยังไม่แน่ใจว่าเข้าใจคำถาม ลองอธิบายเพิ่มอีกนิดได้ไหมคะ?",
    "ตอนนี้ Kafra ตอบได้แค่เรื่องพื้นฐาน ลองถามเรื่องบทความหรือการใช้งานบล็อกดูนะคะ",
    "Kafra ขอเวลาเรียนรู้เรื่องนี้ก่อนนะคะ ระหว่างนี้ลองค้นบทความในบล็อกดูก่อนได้ค่ะ",
];

/// Category -> phrase table with per-category rotation.
#[derive(Debug)]
pub struct FallbackTable {
    phrases: [Vec<String>; 7],
    cursors: [AtomicUsize; 7],
}

impl FallbackTable {
    /// The built-in Thai phrase table.
    pub fn builtin() -> Self {
        let to_owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            phrases: [
                to_owned(GREETING),
                to_owned(HELP),
                to_owned(BLOG),
                to_owned(CODING),
                to_owned(THANKS),
                to_owned(GOODBYE),
                to_owned(DEFAULT),
            ],
            cursors: Default::default(),
        }
    }

    /// Replace the phrases of one category. An empty list is ignored so
    /// every category always has at least one reply.
    pub fn with_phrases(mut self, category: FallbackCategory, phrases: Vec<String>) -> Self {
        if !phrases.is_empty() {
            self.phrases[category.index()] = phrases;
        }
        self
    }

    /// All phrases for a category, in rotation order.
    pub fn phrases(&self, category: FallbackCategory) -> &[String] {
        &self.phrases[category.index()]
    }

    /// Next phrase for the category (round robin).
    pub fn pick(&self, category: FallbackCategory) -> &str {
        let list = &self.phrases[category.index()];
        let n = self.cursors[category.index()].fetch_add(1, Ordering::Relaxed);
        &list[n % list.len()]
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_phrases() {
        let table = FallbackTable::builtin();
        for category in FallbackCategory::ALL {
            assert!(
                !table.phrases(category).is_empty(),
                "category {category} has no phrases"
            );
        }
    }

    #[test]
    fn test_pick_rotates_and_wraps() {
        let table = FallbackTable::builtin();
        let phrases = table.phrases(FallbackCategory::Thanks).to_vec();
        assert_eq!(phrases.len(), 2);

        assert_eq!(table.pick(FallbackCategory::Thanks), phrases[0]);
        assert_eq!(table.pick(FallbackCategory::Thanks), phrases[1]);
        assert_eq!(table.pick(FallbackCategory::Thanks), phrases[0]);
    }

    #[test]
    fn test_rotation_is_per_category() {
        let table = FallbackTable::builtin();
        let first_help = table.phrases(FallbackCategory::Help)[0].clone();
        table.pick(FallbackCategory::Greeting);
        table.pick(FallbackCategory::Greeting);
        assert_eq!(table.pick(FallbackCategory::Help), first_help);
    }

    #[test]
    fn test_with_phrases_ignores_empty_list() {
        let table = FallbackTable::builtin()
            .with_phrases(FallbackCategory::Goodbye, vec![])
            .with_phrases(FallbackCategory::Default, vec!["?".to_string()]);
        assert_eq!(table.phrases(FallbackCategory::Goodbye).len(), 2);
        assert_eq!(table.pick(FallbackCategory::Default), "?");
    }

    #[test]
    fn test_category_key_roundtrip() {
        for category in FallbackCategory::ALL {
            let parsed: FallbackCategory = category.key().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("weather".parse::<FallbackCategory>().is_err());
    }

    #[test]
    fn test_category_serde_uses_key() {
        let json = serde_json::to_string(&FallbackCategory::Thanks);
        assert_eq!(json.unwrap(), "\"thanks\"");
    }
}
