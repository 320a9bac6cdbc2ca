use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate, Clone, Debug)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 20, message = "Field must be between 2 and 20 characters long."))]
    pub username: String,
    #[validate(
        email(message = "Invalid email address."),
        length(max = 120, message = "Field cannot be longer than 120 characters.")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Field must be equal to password."))]
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema, Validate, Clone, Debug)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    /// Keep the session alive for days instead of hours
    #[serde(default)]
    pub remember: bool,
}

#[derive(Deserialize, ToSchema, Validate, Clone, Debug)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 2, max = 20, message = "Field must be between 2 and 20 characters long."))]
    pub username: String,
    #[validate(
        email(message = "Invalid email address."),
        length(max = 120, message = "Field cannot be longer than 120 characters.")
    )]
    pub email: String,
    #[validate(length(max = 120, message = "Field cannot be longer than 120 characters."))]
    pub bio: Option<String>,
}

/// Body for both creating and editing a post
#[derive(Deserialize, ToSchema, Validate, Clone, Debug)]
pub struct PostRequest {
    #[validate(length(min = 1, max = 100, message = "Field must be between 1 and 100 characters long."))]
    pub title: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub content: String,
}

#[derive(Deserialize, ToSchema, Validate, Clone, Debug)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "This field is required."))]
    pub body: String,
}

#[derive(Deserialize, ToSchema, Validate, Clone, Debug)]
pub struct RequestResetRequest {
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
}

#[derive(Deserialize, ToSchema, Validate, Clone, Debug)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Field must be equal to password."))]
    pub confirm_password: String,
}

/// Multipart form accepted by the avatar upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AvatarUploadForm {
    /// jpg, jpeg or png
    #[schema(value_type = String, format = Binary)]
    pub avatar: Vec<u8>,
}
