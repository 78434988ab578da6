//! 类型变量定义
//!
//! 类型变量只是替换表中的下标，外加所属存储的身份标记。
//! 每次访问都会校验标记，防止把一个存储的变量拿到另一个存储里使用。

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_STORE_ID: AtomicU32 = AtomicU32::new(0);

/// 类型存储的身份标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u32);

impl StoreId {
    /// 分配新的存储身份（进程内唯一）
    pub(crate) fn fresh() -> Self {
        StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StoreId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "store{}", self.0)
    }
}

/// 类型变量
///
/// `generic` 标记的变量在 `fresh(_, false)` 时也会被重命名，
/// 用来表示已经泛化的类型参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVariable {
    store: StoreId,
    index: usize,
    generic: bool,
}

impl TypeVariable {
    pub(crate) fn new(
        store: StoreId,
        index: usize,
        generic: bool,
    ) -> Self {
        TypeVariable {
            store,
            index,
            generic,
        }
    }

    /// 获取变量的索引
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_generic(&self) -> bool {
        self.generic
    }

    pub fn store(&self) -> StoreId {
        self.store
    }
}

impl fmt::Display for TypeVariable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let sigil = if self.generic { '?' } else { '\'' };
        write!(f, "{}var{}", sigil, self.index)
    }
}
