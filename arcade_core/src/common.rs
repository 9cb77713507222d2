/// Format used for every date written to a record file, e.g. `2024-03-01 14:05:09`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The ordered alphabet the ladder unlocks in tiers.
pub const LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

pub fn is_letter(letter: char) -> bool {
    letter.is_ascii_uppercase()
}

/// Index of the letter in [LETTERS], if it is one.
pub fn letter_index(letter: char) -> Option<usize> {
    is_letter(letter).then(|| (letter as u8 - b'A') as usize)
}
