//! 组件的链路表
//!
//! 每个组件独占一张，键为链路名。由内核在分配组件身份时创建。

use std::collections::BTreeMap;

use super::link::Link;

#[derive(Debug, Default)]
pub struct LinkMap {
    links: BTreeMap<String, Link>,
}

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    pub fn get_link_mut(&mut self, name: &str) -> Option<&mut Link> {
        self.links.get_mut(name)
    }

    /// 插入链路，返回同名旧链路
    pub fn insert_link(&mut self, link: Link) -> Option<Link> {
        self.links.insert(link.name().to_string(), link)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.links.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Link> {
        self.links.values_mut()
    }
}
