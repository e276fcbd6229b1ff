use std::collections::HashMap;

use crate::foundation::color::Color;
use crate::foundation::math::mul_div255_u8;

/// Cache key for an element rasterized in a color: `"<element_id>::<hex>"`.
pub fn tint_key(element_id: &str, color: Color) -> String {
    format!("{element_id}::{}", color.to_hex())
}

/// Key prefix shared by every tint of one element.
pub fn element_prefix(element_id: &str) -> String {
    format!("{element_id}::")
}

/// Recolored rasters keyed by [`tint_key`].
///
/// Entries are never invalidated implicitly: callers drop stale colors with
/// [`TintCache::invalidate_prefix`].
#[derive(Debug)]
pub struct TintCache<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for TintCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> TintCache<T> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, building it with `build` on a miss.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: &str,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some(v) = self.entries.get(key) {
            return Ok(v.clone());
        }
        let v = build()?;
        self.entries.insert(key.to_owned(), v.clone());
        Ok(v)
    }

    /// `true` when `key` is cached.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove every entry whose key is `prefix` followed by a single color segment. Returns the
    /// number removed.
    ///
    /// Keys of elements whose own id extends the prefix with `::` are kept, so invalidating `a`
    /// leaves the tints of `a::b` alone.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| {
            k.strip_prefix(prefix)
                .is_none_or(|color| color.contains("::"))
        });
        before - self.entries.len()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replace the color of premultiplied RGBA8 pixels with `color`, keeping coverage.
///
/// The result alpha is the source alpha scaled by the color alpha.
pub fn tint_premul_rgba8(data: &mut [u8], color: Color) {
    let [r, g, b, ca] = color.to_rgba8();
    for px in data.chunks_exact_mut(4) {
        let a = mul_div255_u8(u16::from(px[3]), u16::from(ca));
        px[0] = mul_div255_u8(u16::from(r), u16::from(a));
        px[1] = mul_div255_u8(u16::from(g), u16::from(a));
        px[2] = mul_div255_u8(u16::from(b), u16::from(a));
        px[3] = a;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/tint.rs"]
mod tests;
