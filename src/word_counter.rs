/// First and last code points counted as a standalone CJK word.
const CJK_FIRST: char = '\u{4e00}';
const CJK_LAST: char = '\u{9fa5}';

fn is_cjk_ideograph(c: char) -> bool {
    (CJK_FIRST..=CJK_LAST).contains(&c)
}

/// Counts qualifying words: every maximal run of ASCII letters or digits is
/// one word, and every CJK ideograph is a word on its own.
pub fn count(text: &str) -> usize {
    let mut words = 0;
    let mut in_run = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if !in_run {
                words += 1;
                in_run = true;
            }
        } else {
            in_run = false;
            if is_cjk_ideograph(c) {
                words += 1;
            }
        }
    }

    words
}
