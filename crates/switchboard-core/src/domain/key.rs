//! EventKey - イベントキーと payload 型の対応付け
//!
//! キーは比較可能な値で、そのキーが期待する payload の型を `data_type()` で返します。
//! 同じキー型でも値ごとに別の payload 型を宣言できます
//! （例: `UserCreated` は `User`、`PlaylistCreated` は `Playlist`）。
//!
//! # 型消去
//! RouteTable は複数のキー型を 1 つの HashMap に入れるため、キーを `ErasedKey` に包みます。
//! 等価判定は「同じ具象型 かつ 値が等しい」、hash には `TypeId` を混ぜます。
//! 表現が同じでも型が違うキー同士は決して一致しません。

use std::any::{Any, TypeId};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// PayloadType は payload 型の実行時記述子
///
/// 等価判定と hash は `TypeId` のみ。名前はエラーメッセージとログ用。
#[derive(Clone, Copy)]
pub struct PayloadType {
    id: TypeId,
    name: &'static str,
}

impl PayloadType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for PayloadType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PayloadType {}

impl Hash for PayloadType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadType({})", self.name)
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// EventKey は RouteTable のキー
///
/// # 使用例
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum CatalogEvent {
///     UserCreated,
///     PlaylistCreated,
/// }
///
/// impl EventKey for CatalogEvent {
///     fn data_type(&self) -> PayloadType {
///         match self {
///             CatalogEvent::UserCreated => PayloadType::of::<User>(),
///             CatalogEvent::PlaylistCreated => PayloadType::of::<Playlist>(),
///         }
///     }
/// }
/// ```
///
/// # 契約
/// - `data_type()` は同じ値に対してプロセス中ずっと同じ結果を返すこと
/// - `Eq + Hash` は完全一致の lookup に使う
pub trait EventKey: Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// このキー値が運ぶ payload 型
    fn data_type(&self) -> PayloadType;
}

/// [`EventKey`] の object-safe 版（RouteTable 内部用）
pub(crate) trait AnyKey: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn AnyKey) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn describe(&self) -> String;
}

impl<K: EventKey> AnyKey for K {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn AnyKey) -> bool {
        other
            .as_any()
            .downcast_ref::<K>()
            .is_some_and(|other| other == self)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<K>().hash(&mut state);
        self.hash(&mut state);
    }

    fn describe(&self) -> String {
        describe(self)
    }
}

impl PartialEq for dyn AnyKey + 'static {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other)
    }
}

impl Eq for dyn AnyKey + 'static {}

impl Hash for dyn AnyKey + 'static {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dyn_hash(state);
    }
}

/// 所有権付きの型消去キー
///
/// `Borrow<dyn AnyKey>` により `&K` を Box に包まずに lookup できる。
pub(crate) struct ErasedKey(Box<dyn AnyKey>);

impl ErasedKey {
    pub(crate) fn new<K: EventKey>(key: K) -> Self {
        Self(Box::new(key))
    }
}

impl PartialEq for ErasedKey {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl Eq for ErasedKey {}

impl Hash for ErasedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (*self.0).hash(state);
    }
}

impl Borrow<dyn AnyKey + 'static> for ErasedKey {
    fn borrow(&self) -> &(dyn AnyKey + 'static) {
        &*self.0
    }
}

impl fmt::Display for ErasedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.describe())
    }
}

impl fmt::Debug for ErasedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErasedKey({})", self.0.describe())
    }
}

/// エラーとログ用のキー表現
pub(crate) fn describe<K: EventKey>(key: &K) -> String {
    format!("{key:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CatalogEvent, Event, OtherEvent, Playlist, User};
    use std::collections::HashMap;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn payload_type_compares_by_type_id() {
        assert_eq!(PayloadType::of::<User>(), PayloadType::of::<User>());
        assert_ne!(PayloadType::of::<User>(), PayloadType::of::<Playlist>());
        assert!(PayloadType::of::<String>().is::<String>());
        assert!(!PayloadType::of::<String>().is::<&'static str>());
    }

    #[test]
    fn payload_type_displays_type_name() {
        let name = PayloadType::of::<User>().to_string();
        assert!(name.ends_with("User"));
    }

    #[test]
    fn values_of_one_key_type_declare_different_payloads() {
        assert!(CatalogEvent::UserCreated.data_type().is::<User>());
        assert!(CatalogEvent::PlaylistCreated.data_type().is::<Playlist>());
    }

    #[test]
    fn erased_keys_of_same_type_and_value_are_equal() {
        let a = ErasedKey::new(Event("yes"));
        let b = ErasedKey::new(Event("yes"));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, ErasedKey::new(Event("no")));
    }

    #[test]
    fn erased_keys_of_different_types_never_match() {
        // 表現は同じ "yes" だが型が違う
        let a = ErasedKey::new(Event("yes"));
        let b = ErasedKey::new(OtherEvent("yes"));
        assert_ne!(a, b);
    }

    #[test]
    fn borrowed_probe_finds_erased_entry() {
        let mut map = HashMap::new();
        map.insert(ErasedKey::new(Event("yes")), 1);

        let probe: &(dyn AnyKey + 'static) = &Event("yes");
        assert_eq!(map.get(probe), Some(&1));

        let other: &(dyn AnyKey + 'static) = &OtherEvent("yes");
        assert_eq!(map.get(other), None);
    }

    #[test]
    fn erased_key_hash_matches_borrowed_form() {
        let owned = ErasedKey::new(CatalogEvent::UserCreated);
        let borrowed: &(dyn AnyKey + 'static) = &CatalogEvent::UserCreated;
        assert_eq!(hash_of(&owned), hash_of(borrowed));
    }

    #[test]
    fn erased_key_displays_debug_form() {
        assert_eq!(ErasedKey::new(CatalogEvent::UserCreated).to_string(), "UserCreated");
    }
}
