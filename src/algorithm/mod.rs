/// Equal-weight channel blending for previews
pub mod blend;
/// Canvas construction and source placement
pub mod compositor;
