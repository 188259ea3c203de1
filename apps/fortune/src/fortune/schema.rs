//! Shape check for the twelve-sign ranking the site expects.
//!
//! Off by default: the model's text is normally written untouched. With
//! `FORTUNE_VALIDATE` on, a ranking that would break the site is refused instead.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::strip_json_fences;

pub const SIGN_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; SIGN_COUNT] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn english_name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    pub fn japanese_name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "牡羊座",
            ZodiacSign::Taurus => "牡牛座",
            ZodiacSign::Gemini => "双子座",
            ZodiacSign::Cancer => "蟹座",
            ZodiacSign::Leo => "獅子座",
            ZodiacSign::Virgo => "乙女座",
            ZodiacSign::Libra => "天秤座",
            ZodiacSign::Scorpio => "蠍座",
            ZodiacSign::Sagittarius => "射手座",
            ZodiacSign::Capricorn => "山羊座",
            ZodiacSign::Aquarius => "水瓶座",
            ZodiacSign::Pisces => "魚座",
        }
    }

    /// Accepts the English name (any case) or the kanji name, with or without 座.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|sign| {
            let ja = sign.japanese_name();
            sign.english_name().eq_ignore_ascii_case(name)
                || ja == name
                || ja.trim_end_matches('座') == name
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignFortune {
    pub rank: u8,
    pub text: String,
    pub lucky: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("fortune is not a JSON object of sign entries: {0}")]
    NotJson(String),

    #[error("unknown zodiac sign '{0}'")]
    UnknownSign(String),

    #[error("zodiac sign {0} appears more than once")]
    DuplicateSign(&'static str),

    #[error("missing zodiac signs: {}", .0.join(", "))]
    MissingSigns(Vec<&'static str>),

    #[error("{sign} has rank {rank}; ranks must be 1-12")]
    RankOutOfRange { sign: &'static str, rank: u8 },

    #[error("rank {rank} is shared by {first} and {second}")]
    DuplicateRank {
        rank: u8,
        first: &'static str,
        second: &'static str,
    },

    #[error("{0} has an empty fortune text")]
    EmptyText(&'static str),
}

/// A ranking that passed validation, plus the JSON text it was read from
/// (code fences removed).
#[derive(Debug, Clone)]
pub struct ValidatedFortune<'a> {
    pub json: &'a str,
    pub entries: BTreeMap<ZodiacSign, SignFortune>,
}

/// Checks that `text` holds exactly the twelve signs with ranks 1-12, each used once.
pub fn validate_fortune(text: &str) -> Result<ValidatedFortune<'_>, SchemaError> {
    let json = strip_json_fences(text);
    let raw: HashMap<String, SignFortune> =
        serde_json::from_str(json).map_err(|e| SchemaError::NotJson(e.to_string()))?;

    let mut entries = BTreeMap::new();
    for (name, fortune) in raw {
        let sign = ZodiacSign::from_name(&name).ok_or(SchemaError::UnknownSign(name))?;
        if entries.insert(sign, fortune).is_some() {
            return Err(SchemaError::DuplicateSign(sign.english_name()));
        }
    }

    let missing: Vec<&'static str> = ZodiacSign::ALL
        .into_iter()
        .filter(|s| !entries.contains_key(s))
        .map(ZodiacSign::english_name)
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingSigns(missing));
    }

    let mut rank_owner: [Option<ZodiacSign>; SIGN_COUNT] = [None; SIGN_COUNT];
    for (sign, fortune) in &entries {
        if !(1..=SIGN_COUNT as u8).contains(&fortune.rank) {
            return Err(SchemaError::RankOutOfRange {
                sign: sign.english_name(),
                rank: fortune.rank,
            });
        }
        let slot = &mut rank_owner[(fortune.rank - 1) as usize];
        if let Some(first) = slot {
            return Err(SchemaError::DuplicateRank {
                rank: fortune.rank,
                first: first.english_name(),
                second: sign.english_name(),
            });
        }
        *slot = Some(*sign);

        if fortune.text.trim().is_empty() {
            return Err(SchemaError::EmptyText(sign.english_name()));
        }
    }

    Ok(ValidatedFortune { json, entries })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    /// A complete, valid ranking keyed by kanji names, rank = position + 1.
    pub(crate) fn full_ranking() -> Value {
        let mut map = Map::new();
        for (i, sign) in ZodiacSign::ALL.iter().enumerate() {
            map.insert(
                sign.japanese_name().to_string(),
                json!({ "rank": i + 1, "text": "大丈夫、明日はもっと良くなるよ", "lucky": "青いペン" }),
            );
        }
        Value::Object(map)
    }

    #[test]
    fn test_valid_ranking_passes() {
        let text = full_ranking().to_string();
        let validated = validate_fortune(&text).unwrap();
        assert_eq!(validated.entries.len(), SIGN_COUNT);
        assert_eq!(validated.entries[&ZodiacSign::Aries].rank, 1);
        assert_eq!(validated.entries[&ZodiacSign::Pisces].rank, 12);
    }

    #[test]
    fn test_fenced_ranking_passes_and_json_is_unfenced() {
        let inner = full_ranking().to_string();
        let text = format!("```json\n{inner}\n```");
        let validated = validate_fortune(&text).unwrap();
        assert_eq!(validated.json, inner);
    }

    #[test]
    fn test_english_names_accepted() {
        let mut ranking = full_ranking();
        let obj = ranking.as_object_mut().unwrap();
        let entry = obj.remove("牡羊座").unwrap();
        obj.insert("aries".to_string(), entry);
        assert!(validate_fortune(&ranking.to_string()).is_ok());
    }

    #[test]
    fn test_name_without_za_suffix() {
        assert_eq!(ZodiacSign::from_name("蠍"), Some(ZodiacSign::Scorpio));
        assert_eq!(ZodiacSign::from_name("Ophiuchus"), None);
    }

    #[test]
    fn test_missing_sign_rejected() {
        let mut ranking = full_ranking();
        ranking.as_object_mut().unwrap().remove("魚座");
        assert_eq!(
            validate_fortune(&ranking.to_string()).unwrap_err(),
            SchemaError::MissingSigns(vec!["Pisces"])
        );
    }

    #[test]
    fn test_alias_counts_as_duplicate() {
        let mut ranking = full_ranking();
        let obj = ranking.as_object_mut().unwrap();
        obj.insert(
            "Aries".to_string(),
            json!({ "rank": 1, "text": "x", "lucky": "y" }),
        );
        assert_eq!(
            validate_fortune(&ranking.to_string()).unwrap_err(),
            SchemaError::DuplicateSign("Aries")
        );
    }

    #[test]
    fn test_unknown_sign_rejected() {
        let mut ranking = full_ranking();
        ranking
            .as_object_mut()
            .unwrap()
            .insert("蛇遣座".to_string(), json!({ "rank": 3, "text": "x", "lucky": "y" }));
        assert!(matches!(
            validate_fortune(&ranking.to_string()),
            Err(SchemaError::UnknownSign(_))
        ));
    }

    #[test]
    fn test_duplicate_rank_rejected() {
        let mut ranking = full_ranking();
        ranking["牡牛座"]["rank"] = json!(1);
        assert!(matches!(
            validate_fortune(&ranking.to_string()),
            Err(SchemaError::DuplicateRank { rank: 1, .. })
        ));
    }

    #[test]
    fn test_rank_out_of_range_rejected() {
        let mut ranking = full_ranking();
        ranking["魚座"]["rank"] = json!(13);
        assert_eq!(
            validate_fortune(&ranking.to_string()).unwrap_err(),
            SchemaError::RankOutOfRange {
                sign: "Pisces",
                rank: 13
            }
        );
    }

    #[test]
    fn test_empty_text_rejected() {
        let mut ranking = full_ranking();
        ranking["獅子座"]["text"] = json!("  ");
        assert_eq!(
            validate_fortune(&ranking.to_string()).unwrap_err(),
            SchemaError::EmptyText("Leo")
        );
    }

    #[test]
    fn test_prose_rejected() {
        assert!(matches!(
            validate_fortune("今日の運勢は…"),
            Err(SchemaError::NotJson(_))
        ));
    }
}
