//! SVG composition of gallery fragments.
//!
//! Every contributor becomes one [`Fragment`]: an `<a>` element linking to
//! the profile and wrapping an `<image>` whose `xlink:href` is the avatar's
//! inline `data:` URI. [`finalize`] places the fragments, in order, inside an
//! `<svg>` envelope sized to the canvas bounds.

use log::{debug, trace};
use svg::{Document, node::element as svg_element};

use galleria_core::{
    entity::Entity,
    geometry::{CanvasBounds, Placement},
};

use crate::avatar::TransformedAvatar;

/// Class carried by every fragment link.
pub const FRAGMENT_CLASS: &str = "contributor-gallery";

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// One clickable, positioned avatar.
#[derive(Debug, Clone)]
pub struct Fragment {
    id: String,
    placement: Placement,
    anchor: svg_element::Anchor,
}

impl Fragment {
    /// Identifier of the entity this fragment shows.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Where the avatar is drawn.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Consumes the fragment, returning its SVG element.
    pub fn into_element(self) -> svg_element::Anchor {
        self.anchor
    }
}

/// Builds the fragment for one contributor.
///
/// The profile URL is emitted in its serialized form. URL serialization
/// percent-encodes quotes and angle brackets, so the value cannot terminate
/// its attribute.
///
/// # Arguments
///
/// * `entity` - Contributor whose profile is the click target.
/// * `avatar` - Masked avatar embedded inline.
/// * `placement` - Top-left corner assigned by the layout.
/// * `size` - Displayed side length.
pub fn compose_fragment(
    entity: &Entity,
    avatar: &TransformedAvatar,
    placement: Placement,
    size: u32,
) -> Fragment {
    let image = svg_element::Image::new()
        .set("x", placement.x())
        .set("y", placement.y())
        .set("width", size)
        .set("height", size)
        .set("xlink:href", avatar.data_uri());

    let anchor = svg_element::Anchor::new()
        .set("xlink:href", entity.profile_url().as_str())
        .set("class", FRAGMENT_CLASS)
        .set("target", "_blank")
        .set("rel", "nofollow")
        .add(image);

    trace!(id = entity.id(), placement:% = placement; "Composed fragment");

    Fragment {
        id: entity.id().to_string(),
        placement,
        anchor,
    }
}

/// Wraps `fragments` in a document declaring `bounds`.
pub fn finalize(fragments: impl IntoIterator<Item = Fragment>, bounds: CanvasBounds) -> Document {
    let style = svg_element::Style::new(format!(".{FRAGMENT_CLASS} {{ cursor: pointer; }}"));

    let document = Document::new()
        .set("xmlns", SVG_NAMESPACE)
        .set("xmlns:xlink", XLINK_NAMESPACE)
        .set("width", bounds.width())
        .set("height", bounds.height())
        .add(style);

    fragments
        .into_iter()
        .fold(document, |document, fragment| document.add(fragment.into_element()))
}

/// Accumulates fragments of one gallery in placement order.
#[derive(Debug, Clone)]
pub struct SvgComposer {
    avatar_size: u32,
    fragments: Vec<Fragment>,
}

impl SvgComposer {
    /// Creates an empty composer for avatars displayed at `avatar_size`.
    pub fn new(avatar_size: u32) -> Self {
        Self {
            avatar_size,
            fragments: Vec::new(),
        }
    }

    /// Composes and appends the fragment of one contributor.
    pub fn push(&mut self, entity: &Entity, avatar: &TransformedAvatar, placement: Placement) {
        self.fragments
            .push(compose_fragment(entity, avatar, placement, self.avatar_size));
    }

    /// Number of fragments composed so far.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether no fragment was composed.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Consumes the composer and serializes the final document.
    pub fn finish(self, bounds: CanvasBounds) -> String {
        debug!(fragments = self.fragments.len(), bounds:% = bounds; "Serializing SVG document");
        finalize(self.fragments, bounds).to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};
    use url::Url;

    use super::*;
    use crate::avatar::mask_avatar;

    fn entity(id: &str, profile: &str) -> Entity {
        Entity::new(
            id,
            Url::parse("https://avatars.example.com/u/1").unwrap(),
            Url::parse(profile).unwrap(),
            1,
        )
    }

    fn avatar(id: &str) -> TransformedAvatar {
        let mut png = Vec::new();
        RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255]))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        mask_avatar(id, &png, 48).unwrap()
    }

    #[test]
    fn test_fragment_attributes() {
        let alice = entity("alice", "https://github.com/alice");
        let fragment = compose_fragment(&alice, &avatar("alice"), Placement::new(52, 2, 1, 2), 48);

        assert_eq!(fragment.id(), "alice");
        assert_eq!(fragment.placement(), Placement::new(52, 2, 1, 2));

        let rendered = fragment.into_element().to_string();
        assert!(rendered.starts_with("<a"));
        assert!(rendered.contains(r#"xlink:href="https://github.com/alice""#));
        assert!(rendered.contains(r#"class="contributor-gallery""#));
        assert!(rendered.contains(r#"target="_blank""#));
        assert!(rendered.contains(r#"rel="nofollow""#));
        assert!(rendered.contains(r#"x="52""#));
        assert!(rendered.contains(r#"y="2""#));
        assert!(rendered.contains(r#"width="48""#));
        assert!(rendered.contains(r#"height="48""#));
        assert!(rendered.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_profile_url_cannot_break_out_of_attribute() {
        let mallory = entity("mallory", "https://example.com/\"><script>alert(1)</script>");
        let rendered = compose_fragment(&mallory, &avatar("mallory"), Placement::new(2, 2, 1, 1), 48)
            .into_element()
            .to_string();

        assert!(!rendered.contains("<script"));
        assert!(rendered.contains("%22%3E%3Cscript%3E"));
    }

    #[test]
    fn test_finalize_envelope() {
        let fragments = vec![
            compose_fragment(
                &entity("alice", "https://github.com/alice"),
                &avatar("alice"),
                Placement::new(2, 2, 1, 1),
                48,
            ),
            compose_fragment(
                &entity("bob", "https://github.com/bob"),
                &avatar("bob"),
                Placement::new(52, 2, 1, 2),
                48,
            ),
        ];

        let svg = finalize(fragments, CanvasBounds::new(152, 52)).to_string();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(svg.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(svg.contains(r#"width="152""#));
        assert!(svg.contains(r#"height="52""#));
        assert!(svg.contains(".contributor-gallery { cursor: pointer; }"));
        assert_eq!(svg.matches("<a ").count(), 2);

        let alice = svg.find("github.com/alice").unwrap();
        let bob = svg.find("github.com/bob").unwrap();
        assert!(alice < bob, "fragments must keep their order");
    }

    #[test]
    fn test_empty_composer() {
        let composer = SvgComposer::new(48);
        assert!(composer.is_empty());

        let svg = composer.finish(CanvasBounds::new(502, 52));
        assert_eq!(svg.matches("<a ").count(), 0);
        assert!(svg.contains(r#"height="52""#));
    }

    #[test]
    fn test_composer_accumulates() {
        let mut composer = SvgComposer::new(32);
        composer.push(
            &entity("alice", "https://github.com/alice"),
            &avatar("alice"),
            Placement::new(2, 2, 1, 1),
        );
        assert_eq!(composer.len(), 1);

        let svg = composer.finish(CanvasBounds::new(36, 36));
        assert!(svg.contains(r#"width="32""#));
    }
}
