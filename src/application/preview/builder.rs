use crate::domain::blocks::Udi;
use crate::domain::elements::PublishedElement;
use crate::domain::instance::{
    BlockGridItem, BlockItem, BlockShape, BlockVariant, ModelType, SettingsSlot,
    TypedBlockInstance,
};

/// Builds the typed instance for a block.
///
/// Returns `None` when the content model or content element is missing. The
/// shape is picked from the variant and whether both a settings model and a
/// settings element are present; settings without a model are passed through
/// untyped, and absent settings become an empty placeholder.
pub fn build_instance(
    variant: BlockVariant,
    content_type: Option<&ModelType>,
    content_element: Option<PublishedElement>,
    settings_type: Option<&ModelType>,
    settings_element: Option<PublishedElement>,
    content_udi: Option<Udi>,
    settings_udi: Option<Udi>,
) -> Option<TypedBlockInstance> {
    let content = content_type?.bind(content_element?);
    let has_settings = settings_type.is_some() && settings_element.is_some();

    let settings = match (settings_type, settings_element) {
        (Some(model), Some(element)) => SettingsSlot::Typed(model.bind(element)),
        (None, Some(element)) => SettingsSlot::Untyped(element),
        (_, None) => SettingsSlot::empty(),
    };

    let item = BlockItem {
        content_udi,
        content,
        settings_udi,
        settings,
    };

    let instance = match BlockShape::select(variant, has_settings) {
        BlockShape::List | BlockShape::ListWithSettings => TypedBlockInstance::List(item),
        BlockShape::Grid | BlockShape::GridWithSettings => {
            TypedBlockInstance::Grid(BlockGridItem::new(item))
        }
    };

    Some(instance)
}
