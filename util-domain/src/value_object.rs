//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象。
//!

use std::fmt;

use util_macros::value_object;
use uuid::Uuid;

/// 版本令牌（用于乐观并发控制）
///
/// 不透明的字节序列，只参与相等比较。每次成功写入后由存储重新生成，
/// 调用方提交更新时携带的令牌必须与存储中的令牌一致。
///
/// # 示例
///
/// ```
/// use util_domain::value_object::VersionToken;
///
/// let empty = VersionToken::default();
/// assert!(empty.is_empty());
///
/// let t1 = VersionToken::generate();
/// let t2 = t1.regenerate();
/// assert_ne!(t1, t2);
/// assert_eq!(t1.as_bytes().len(), 16);
/// ```
#[value_object]
#[derive(Hash)]
pub struct VersionToken(Vec<u8>);

impl VersionToken {
    /// 生成一个新的随机令牌（16 字节）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().as_bytes().to_vec())
    }

    /// 生成一个与当前令牌不同的新令牌
    pub fn regenerate(&self) -> Self {
        loop {
            let next = Self::generate();
            if next != *self {
                return next;
            }
        }
    }

    /// 从原始字节创建令牌
    ///
    /// ```
    /// use util_domain::value_object::VersionToken;
    ///
    /// let t = VersionToken::from_bytes(vec![0xde, 0xad]);
    /// assert_eq!(t.to_string(), "dead");
    /// ```
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 空令牌表示实体尚未持久化
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl From<Vec<u8>> for VersionToken {
    fn from(value: Vec<u8>) -> Self {
        Self::from_bytes(value)
    }
}

impl From<Uuid> for VersionToken {
    fn from(value: Uuid) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_default_is_empty() {
        let t = VersionToken::default();
        assert!(t.is_empty());
        assert_eq!(t.to_string(), "");
    }

    #[test]
    fn test_token_generate_is_unique() {
        let t1 = VersionToken::generate();
        let t2 = VersionToken::generate();
        assert!(!t1.is_empty());
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_token_regenerate_differs() {
        let t = VersionToken::generate();
        for _ in 0..16 {
            assert_ne!(t.regenerate(), t);
        }
    }

    // 比较只看字节内容
    #[test]
    fn test_token_equality_by_bytes() {
        let id = Uuid::new_v4();
        let a = VersionToken::from(id);
        let b = VersionToken::from_bytes(id.as_bytes().to_vec());
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_display_hex() {
        let t = VersionToken::from_bytes([0x00, 0x0f, 0xa0]);
        assert_eq!(format!("{t}"), "000fa0");
    }

    #[test]
    fn test_token_serde() {
        let t = VersionToken::from_bytes(vec![1, 2, 3]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: VersionToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
