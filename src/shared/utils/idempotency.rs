/// 멱등성 키 생성기
/// Idempotency Key Generator
///
/// 역할:
/// - 상태를 변경하는 요청(POST/PUT/PATCH/DELETE)마다 고유한 키 생성
/// - 서버는 이 키로 재전송된 요청을 중복 제거함
///
/// 사용 방법:
/// ```rust
/// use wallet_client::shared::utils::generate_key;
///
/// let key = generate_key();
/// assert_eq!(key.as_str().len(), 36);
/// ```
///
/// 키는 요청을 만들 때마다 새로 생성된다. 같은 논리적 작업을 재시도하면서
/// 같은 키를 쓰고 싶다면 호출자가 키를 직접 만들어 넘긴다
/// (`TransactOptions::with_idempotency_key`).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// HTTP 헤더 이름
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// 멱등성 키 (UUID v4 문자열)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// 외부에서 받은 키 사용 (호출자 재시도 루프용)
    /// Wrap a caller-owned key so it can be reused across retries
    pub fn from_string(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UUID v4 형식인지 확인 (8-4-4-4-12, version 4, variant 8/9/a/b)
    pub fn is_uuid_v4(&self) -> bool {
        is_uuid_v4_shape(&self.0)
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 새 멱등성 키 생성
/// Generate a fresh key. Pure apart from the OS randomness; never fails.
pub fn generate_key() -> IdempotencyKey {
    IdempotencyKey(Uuid::new_v4().hyphenated().to_string())
}

fn is_uuid_v4_shape(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    let lengths = [8, 4, 4, 4, 12];
    if groups.len() != lengths.len() {
        return false;
    }
    let hex_ok = groups.iter().zip(lengths).all(|(group, len)| {
        group.len() == len
            && group
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    });
    if !hex_ok {
        return false;
    }
    groups[2].starts_with('4') && matches!(groups[3].chars().next(), Some('8' | '9' | 'a' | 'b'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_keys_are_unique_uuid_v4() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let key = generate_key();
            assert!(key.is_uuid_v4(), "not a v4 uuid: {}", key);
            assert!(seen.insert(key), "duplicate key generated");
        }
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn test_shape_check_rejects_wrong_version_and_variant() {
        assert!(!is_uuid_v4_shape("123e4567-e89b-12d3-a456-426614174000"));
        assert!(!is_uuid_v4_shape("123e4567-e89b-42d3-c456-426614174000"));
        assert!(!is_uuid_v4_shape("not-a-uuid"));
        assert!(is_uuid_v4_shape("123e4567-e89b-42d3-a456-426614174000"));
    }

    #[test]
    fn test_caller_supplied_key_is_kept_verbatim() {
        let key = IdempotencyKey::from_string("retry-loop-1");
        assert_eq!(key.as_str(), "retry-loop-1");
        assert!(!key.is_uuid_v4());
    }
}
