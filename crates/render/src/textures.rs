use rigscene_common::TextureHandle;
use std::collections::BTreeMap;

/// Maps texture file names to handles. Loading the same name twice yields
/// the same handle.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    by_name: BTreeMap<String, TextureHandle>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, name: &str) -> TextureHandle {
        if let Some(handle) = self.by_name.get(name) {
            return *handle;
        }
        let handle = TextureHandle(self.by_name.len() as u32);
        self.by_name.insert(name.to_string(), handle);
        tracing::debug!(name, ?handle, "registered texture");
        handle
    }

    pub fn name(&self, handle: TextureHandle) -> Option<&str> {
        self.by_name
            .iter()
            .find(|(_, h)| **h == handle)
            .map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_is_deduplicated() {
        let mut reg = TextureRegistry::new();
        let a = reg.load("mario.jpg");
        let b = reg.load("mario.jpg");
        let c = reg.load("white1x1.png");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.name(c), Some("white1x1.png"));
    }
}
