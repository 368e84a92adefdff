//! Authentication use cases

pub mod use_cases;

pub use use_cases::{
    AuthMethod, AuthenticatedUser, IssueApiKeyUseCase, LoginResult, LoginUseCase,
    RegisterUserInput, RegisterUserUseCase, RequestIdentity, ResolveIdentityUseCase,
};
