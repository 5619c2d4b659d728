use crate::parser::{FieldMap, JsonDecoder, JSON_KEY};

use super::{Message, ReadError, Reader};

/// Decodes every record of the wrapped reader as JSON.
///
/// The record content becomes the decoder's leftover text and the decoded
/// fields are attached under `json` (as `null` when nothing was decoded).
pub struct JsonReader<R> {
    reader: R,
    decoder: JsonDecoder,
}

impl<R: Reader> JsonReader<R> {
    pub fn new(reader: R, decoder: JsonDecoder) -> Self {
        Self { reader, decoder }
    }

    pub fn decoder(&self) -> &JsonDecoder {
        &self.decoder
    }
}

impl<R: Reader> Reader for JsonReader<R> {
    fn next(&mut self) -> Result<Message, ReadError> {
        let mut message = self.reader.next()?;

        let decoded = self.decoder.decode(std::mem::take(&mut message.content));
        message.content = decoded.text;

        let mut fields = FieldMap::new();
        fields.insert(JSON_KEY.to_string(), decoded.fields.into());
        message.add_fields(fields);

        Ok(message)
    }
}
