//! Kana width and script conversion

/// Full-width forms of U+FF61..=U+FF9F, in code point order
const HALFWIDTH_TABLE: &str = "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン゛゜";

const HALFWIDTH_START: u32 = 0xFF61;
const HALFWIDTH_VOICED_MARK: char = '\u{FF9E}';
const HALFWIDTH_SEMI_VOICED_MARK: char = '\u{FF9F}';

fn halfwidth_to_fullwidth(c: char) -> Option<char> {
    let offset = (c as u32).checked_sub(HALFWIDTH_START)?;
    HALFWIDTH_TABLE.chars().nth(offset as usize)
}

/// ガ from カ, ヴ from ウ
fn voiced(c: char) -> Option<char> {
    match c {
        'ウ' => Some('ヴ'),
        c if is_voiceable_base(c) => char::from_u32(c as u32 + 1),
        _ => None,
    }
}

/// パ from ハ
fn semi_voiced(c: char) -> Option<char> {
    match c {
        'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(c as u32 + 2),
        _ => None,
    }
}

fn is_voiceable_base(c: char) -> bool {
    "カキクケコサシスセソタチツテトハヒフヘホ".contains(c)
}

/// Convert half-width katakana to full-width, folding a following
/// half-width (semi-)voiced mark into the kana. Other text is untouched.
pub fn halfwidth_to_fullwidth_kana(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let Some(full) = halfwidth_to_fullwidth(c) else {
            out.push(c);
            continue;
        };
        let combined = match chars.peek() {
            Some(&HALFWIDTH_VOICED_MARK) => voiced(full),
            Some(&HALFWIDTH_SEMI_VOICED_MARK) => semi_voiced(full),
            _ => None,
        };
        match combined {
            Some(kana) => {
                chars.next();
                out.push(kana);
            }
            None => out.push(full),
        }
    }
    out
}

/// Convert katakana to hiragana (ァ..ヶ and the iteration marks)
pub fn katakana_to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ァ'..='ヶ' | 'ヽ' | 'ヾ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// ぁ..ん, the characters a bare lyric may keep
pub fn is_plain_hiragana(c: char) -> bool {
    ('ぁ'..='ん').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_block() {
        assert_eq!(HALFWIDTH_TABLE.chars().count(), 63);
        assert_eq!(halfwidth_to_fullwidth('ｱ'), Some('ア'));
        assert_eq!(halfwidth_to_fullwidth('ﾝ'), Some('ン'));
        assert_eq!(halfwidth_to_fullwidth('ﾟ'), Some('゜'));
        assert_eq!(halfwidth_to_fullwidth('a'), None);
    }

    #[test]
    fn test_halfwidth_with_marks() {
        assert_eq!(halfwidth_to_fullwidth_kana("ｶﾞｷﾞﾊﾟｳﾞ"), "ガギパヴ");
        assert_eq!(halfwidth_to_fullwidth_kana("ﾏﾞ"), "マ゛");
        assert_eq!(halfwidth_to_fullwidth_kana("a ｱ"), "a ア");
        assert_eq!(halfwidth_to_fullwidth_kana("ｯﾞ"), "ッ゛");
    }

    #[test]
    fn test_katakana_to_hiragana() {
        assert_eq!(katakana_to_hiragana("カタカナ ヴ ヶ"), "かたかな ゔ ゖ");
        assert_eq!(katakana_to_hiragana("ー R"), "ー R");
    }

    #[test]
    fn test_plain_hiragana() {
        assert!(is_plain_hiragana('ぁ'));
        assert!(is_plain_hiragana('ん'));
        assert!(!is_plain_hiragana('ゔ'));
        assert!(!is_plain_hiragana('ア'));
    }
}
