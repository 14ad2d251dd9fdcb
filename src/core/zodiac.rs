//! Calendar-date sun sign lookup using Western tropical cusps.

use crate::domain::model::ZodiacSign;

/// First day of each sign, indexed by month (January first).
const CUSPS: [(u32, ZodiacSign); 12] = [
    (20, ZodiacSign::Aquarius),
    (19, ZodiacSign::Pisces),
    (21, ZodiacSign::Aries),
    (20, ZodiacSign::Taurus),
    (21, ZodiacSign::Gemini),
    (21, ZodiacSign::Cancer),
    (23, ZodiacSign::Leo),
    (23, ZodiacSign::Virgo),
    (23, ZodiacSign::Libra),
    (23, ZodiacSign::Scorpio),
    (22, ZodiacSign::Sagittarius),
    (22, ZodiacSign::Capricorn),
];

/// Sun sign for a calendar date. Returns `None` for a month outside 1..=12
/// or a day outside 1..=31.
pub fn zodiac_sign(month: u32, day: u32) -> Option<ZodiacSign> {
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let idx = (month - 1) as usize;
    let (start_day, sign) = CUSPS[idx];
    if day >= start_day {
        Some(sign)
    } else {
        // 交界日之前屬於上個月開始的星座
        Some(CUSPS[(idx + 11) % 12].1)
    }
}
