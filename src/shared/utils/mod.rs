/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - 멱등성 키 생성기
/// - 금액 직렬화 헬퍼
/// - 요청 순서 관리 (마지막 요청 우선)
pub mod idempotency;
pub mod money;
pub mod request_sequencer;

pub use idempotency::*;
pub use request_sequencer::*;
