/// A file handed to the upload pipeline, plaintext bytes included.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn size(&self) -> i64 {
        self.data.len() as i64
    }
}
