/// Image received through the multipart `image` field
#[derive(Debug)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// Content type declared on the multipart field
    pub mime_type: String,
}
