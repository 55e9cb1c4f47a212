//! 时间单位解析
//!
//! 支持 `<数值><SI 前缀><s|Hz>`，数值可带小数，中间可有空白，例如
//! `"1ns"`、`"2.5 GHz"`、`"500ps"`、`"1 s"`。频率会被换算为周期。
//! 全程使用 u128 有理数运算，避免浮点误差。

use super::error::TimeError;

/// 单位的物理量种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Period,
    Frequency,
}

/// 解析后的周期（秒），以 `num / den` 表示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub kind: UnitKind,
    pub num: u128,
    pub den: u128,
}

impl Period {
    /// 严格短于 `core`（按精确比值，不做舍入）
    pub fn finer_than(&self, core: &Period) -> Option<bool> {
        let a = self.num.checked_mul(core.den)?;
        let b = self.den.checked_mul(core.num)?;
        Some(a < b)
    }

    /// 以 `core` 为单位的 tick 数，四舍五入。返回 (tick 数, 是否整除)。
    pub fn ticks_of(&self, core: &Period) -> Option<(u128, bool)> {
        // (num/den) / (core.num/core.den) = num*core.den / (den*core.num)
        let a = self.num.checked_mul(core.den)?;
        let b = self.den.checked_mul(core.num)?;
        if b == 0 {
            return None;
        }
        let exact = a % b == 0;
        let rounded = a.checked_add(b / 2)? / b;
        Some((rounded, exact))
    }
}

fn si_exponent(prefix: &str) -> Option<i32> {
    let e = match prefix {
        "" => 0,
        "f" => -15,
        "p" => -12,
        "n" => -9,
        "u" | "µ" | "μ" => -6,
        "m" => -3,
        "k" | "K" => 3,
        "M" => 6,
        "G" => 9,
        "T" => 12,
        _ => return None,
    };
    Some(e)
}

fn pow10(e: u32) -> Option<u128> {
    10u128.checked_pow(e)
}

/// 解析单位字符串为周期
pub fn parse_period(spec: &str) -> Result<Period, TimeError> {
    let s = spec.trim();
    if s.is_empty() {
        return Err(TimeError::Empty);
    }

    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let unit = unit.trim();

    if number.is_empty() || number.matches('.').count() > 1 || number == "." {
        return Err(TimeError::InvalidNumber(spec.to_string()));
    }

    // 小数转为 mantissa / 10^frac_digits
    let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
    let digits = format!("{int_part}{frac_part}");
    let mut num: u128 = digits
        .parse()
        .map_err(|_| TimeError::InvalidNumber(spec.to_string()))?;
    let frac_digits =
        u32::try_from(frac_part.len()).map_err(|_| TimeError::Overflow(spec.to_string()))?;
    let mut den = pow10(frac_digits).ok_or_else(|| TimeError::Overflow(spec.to_string()))?;

    let (kind, prefix) = if let Some(p) = unit.strip_suffix("Hz") {
        (UnitKind::Frequency, p)
    } else if let Some(p) = unit.strip_suffix('s') {
        (UnitKind::Period, p)
    } else {
        return Err(TimeError::UnknownUnit(spec.to_string()));
    };
    let exp = si_exponent(prefix).ok_or_else(|| TimeError::UnknownUnit(spec.to_string()))?;

    let scale = pow10(exp.unsigned_abs()).ok_or_else(|| TimeError::Overflow(spec.to_string()))?;
    if exp >= 0 {
        num = num
            .checked_mul(scale)
            .ok_or_else(|| TimeError::Overflow(spec.to_string()))?;
    } else {
        den = den
            .checked_mul(scale)
            .ok_or_else(|| TimeError::Overflow(spec.to_string()))?;
    }

    if num == 0 {
        return Err(TimeError::ZeroValue(spec.to_string()));
    }

    Ok(match kind {
        UnitKind::Period => Period { kind, num, den },
        // 周期 = 1 / 频率
        UnitKind::Frequency => Period {
            kind,
            num: den,
            den: num,
        },
    })
}
