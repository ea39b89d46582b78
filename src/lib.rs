// Wallet service client library
// 지갑 서비스 클라이언트 (로컬 검증, 세션, 인증 요청)
pub mod domains;
pub mod logging;
pub mod shared;

#[cfg(feature = "mock-server")]
pub mod mock_server;
