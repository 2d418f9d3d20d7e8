use tracing::warn;

use crate::application::error::PreviewError;
use crate::application::ports::{ElementConverter, PropertyCacheLevel};
use crate::domain::blocks::RawBlockItem;
use crate::domain::elements::PublishedElement;

/// Converts raw block data through the host converter.
///
/// With `strict` set, an unresolvable content type fails the render with a
/// conversion error naming the alias. Otherwise the element is silently absent.
pub async fn convert_element(
    converter: &dyn ElementConverter,
    item: &RawBlockItem,
    strict: bool,
) -> Result<Option<PublishedElement>, PreviewError> {
    let converted = converter
        .convert_to_element(item, PropertyCacheLevel::None, strict)
        .await;

    match converted {
        Ok(Some(element)) => Ok(Some(element)),
        Ok(None) if strict => Err(PreviewError::conversion(item.content_type_label())),
        Ok(None) => Ok(None),
        Err(err) if strict => Err(err.into()),
        Err(err) => {
            warn!(
                content_type = %item.content_type_label(),
                error = %err,
                "element conversion failed; continuing without it"
            );
            Ok(None)
        }
    }
}
