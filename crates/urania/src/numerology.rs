//! Pythagorean digit matrix of a birth date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MATRIX_DIGITS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumerologyMatrix {
    pub birth_date: NaiveDate,
    /// Count of each digit '1'..='9' across day, month and year
    pub digit_counts: BTreeMap<char, u32>,
    /// Digit sum of DDMMYYYY
    pub first: u32,
    /// Digit sum of `first`
    pub second: u32,
    /// `first` minus twice the leading digit of the two-digit day
    pub third: i32,
    /// Digit sum of `third`
    pub fourth: u32,
    /// Sum of all digit counts
    pub total_digits: u32,
    /// Digits appearing at least twice
    pub repeated_digits: Vec<char>,
    /// Digits not appearing at all
    pub missing_digits: Vec<char>,
}

impl NumerologyMatrix {
    pub fn calculate(birth_date: NaiveDate) -> Self {
        let day = birth_date.day();
        let month = birth_date.month();
        let year = birth_date.year();

        let padded = format!("{:02}{:02}{}", day, month, year);
        let first = digit_sum(&padded);
        let second = digit_sum(&first.to_string());
        let third = first as i32 - 2 * (day / 10) as i32;
        let fourth = digit_sum(&third.unsigned_abs().to_string());

        let digits = format!("{}{}{}", day, month, year);
        let digit_counts: BTreeMap<char, u32> = MATRIX_DIGITS
            .iter()
            .map(|&d| (d, digits.chars().filter(|&c| c == d).count() as u32))
            .collect();

        let total_digits = digit_counts.values().sum();
        let repeated_digits = digit_counts
            .iter()
            .filter(|(_, &count)| count >= 2)
            .map(|(&d, _)| d)
            .collect();
        let missing_digits = digit_counts
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(&d, _)| d)
            .collect();

        Self {
            birth_date,
            digit_counts,
            first,
            second,
            third,
            fourth,
            total_digits,
            repeated_digits,
            missing_digits,
        }
    }

    pub fn count(&self, digit: char) -> u32 {
        self.digit_counts.get(&digit).copied().unwrap_or(0)
    }

    /// Cells as a 3x3 grid in the traditional column layout (1-4-7 / 2-5-8 / 3-6-9)
    pub fn grid(&self) -> [[String; 3]; 3] {
        let cell = |d: char| {
            let n = self.count(d);
            if n == 0 {
                "-".to_string()
            } else {
                d.to_string().repeat(n as usize)
            }
        };
        [
            [cell('1'), cell('4'), cell('7')],
            [cell('2'), cell('5'), cell('8')],
            [cell('3'), cell('6'), cell('9')],
        ]
    }
}

fn digit_sum(text: &str) -> u32 {
    text.chars().filter_map(|c| c.to_digit(10)).sum()
}
