pub mod ip;
pub mod url_validator;

/// 短码字符集：小写 base36
const SHORT_CODE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 外部传入短码的最大长度
pub const MAX_SHORT_CODE_LEN: usize = 64;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| {
        SHORT_CODE_ALPHABET[rand::random_range(0..SHORT_CODE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// 短码格式检查：`[A-Za-z0-9_-]{1,64}`
///
/// 不合法的短码直接视为不存在，不访问存储。
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_SHORT_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
