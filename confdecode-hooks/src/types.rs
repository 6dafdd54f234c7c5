//! Source kinds and destination type descriptors

use crate::translate::{KeyMapping, KeyTranslator};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

/// Kind of an untyped source node, as seen by the host decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// JSON null (or an absent block)
    Null,
    /// Boolean value
    Bool,
    /// Integer or floating point number
    Number,
    /// String value
    String,
    /// Array of values
    Sequence,
    /// Object keyed by strings
    Map,
}

impl SourceKind {
    /// Classify a value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => SourceKind::Null,
            Value::Bool(_) => SourceKind::Bool,
            Value::Number(_) => SourceKind::Number,
            Value::String(_) => SourceKind::String,
            Value::Array(_) => SourceKind::Sequence,
            Value::Object(_) => SourceKind::Map,
        }
    }
}

/// Shape of a destination type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Structure with named fields
    Struct,
    /// Pointer-like wrapper (`Option<T>`, `Box<T>`)
    Pointer,
    /// Growable sequence (`Vec<T>`)
    Sequence,
    /// Fixed-size array (`[T; N]`)
    Array(usize),
    /// String-keyed map
    Map,
    /// Leaf value (numbers, strings, booleans, paths)
    Scalar,
    /// Untyped value that accepts anything (`serde_json::Value`)
    Any,
}

/// Which form of [`KeyTranslator`] a type registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorForm {
    /// `impl KeyTranslator for T`
    Value,
    /// `impl KeyTranslator for Box<T>`
    Pointer,
}

/// Key mapping capability recorded on a descriptor
#[derive(Clone, Copy)]
pub struct TranslatorCapability {
    form: TranslatorForm,
    mapping: fn() -> KeyMapping,
}

impl TranslatorCapability {
    /// Form the capability was registered with
    pub fn form(&self) -> TranslatorForm {
        self.form
    }

    /// Ask a default instance of the type for its key mapping
    pub fn key_mapping(&self) -> KeyMapping {
        (self.mapping)()
    }
}

impl fmt::Debug for TranslatorCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorCapability")
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

fn mapping_by_value<T: KeyTranslator + Default>() -> KeyMapping {
    T::default().decode_key_mapping()
}

fn mapping_by_ref<T: Default>() -> KeyMapping
where
    Box<T>: KeyTranslator,
{
    Box::<T>::default().decode_key_mapping()
}

/// A named field of a structure descriptor
///
/// The field type is resolved lazily so self-referential schemas
/// (`Option<Box<Self>>`) can be described.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    name: &'static str,
    describe: fn() -> TypeDescriptor,
}

impl FieldDescriptor {
    /// Field name as declared on the destination
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Descriptor of the field type
    pub fn descriptor(&self) -> TypeDescriptor {
        (self.describe)()
    }
}

/// Metadata describing the shape of a destination type
///
/// Descriptors are never mutated by hooks.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: &'static str,
    kind: TypeKind,
    elem: Option<fn() -> TypeDescriptor>,
    fields: Vec<FieldDescriptor>,
    translator: Option<TranslatorCapability>,
}

impl TypeDescriptor {
    fn new(name: &'static str, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            elem: None,
            fields: Vec::new(),
            translator: None,
        }
    }

    /// Structure with no fields yet; add them with [`TypeDescriptor::field`]
    pub fn structure(name: &'static str) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    /// Leaf value
    pub fn scalar(name: &'static str) -> Self {
        Self::new(name, TypeKind::Scalar)
    }

    /// Untyped value
    pub fn any(name: &'static str) -> Self {
        Self::new(name, TypeKind::Any)
    }

    /// Pointer-like wrapper around `T`
    pub fn pointer<T: Describe>(name: &'static str) -> Self {
        Self::new(name, TypeKind::Pointer).with_elem(T::describe)
    }

    /// Sequence of `T`
    pub fn sequence<T: Describe>(name: &'static str) -> Self {
        Self::new(name, TypeKind::Sequence).with_elem(T::describe)
    }

    /// Fixed-size array of `len` elements of `T`
    pub fn array<T: Describe>(name: &'static str, len: usize) -> Self {
        Self::new(name, TypeKind::Array(len)).with_elem(T::describe)
    }

    /// String-keyed map with `V` values
    pub fn map<V: Describe>(name: &'static str) -> Self {
        Self::new(name, TypeKind::Map).with_elem(V::describe)
    }

    fn with_elem(mut self, elem: fn() -> TypeDescriptor) -> Self {
        self.elem = Some(elem);
        self
    }

    /// Declare a field of type `T`
    pub fn field<T: Describe>(mut self, name: &'static str) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            describe: T::describe,
        });
        self
    }

    /// Register the by-value key mapping capability of `T`
    pub fn translate_keys<T: KeyTranslator + Default>(mut self) -> Self {
        self.translator = Some(TranslatorCapability {
            form: TranslatorForm::Value,
            mapping: mapping_by_value::<T>,
        });
        self
    }

    /// Register the by-reference (`Box<T>`) key mapping capability of `T`
    pub fn translate_keys_by_ref<T: Default>(mut self) -> Self
    where
        Box<T>: KeyTranslator,
    {
        self.translator = Some(TranslatorCapability {
            form: TranslatorForm::Pointer,
            mapping: mapping_by_ref::<T>,
        });
        self
    }

    /// Type name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Shape of the type
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Element descriptor for pointer, sequence, array and map kinds
    pub fn elem(&self) -> Option<TypeDescriptor> {
        self.elem.map(|describe| describe())
    }

    /// Declared fields (empty unless this is a structure)
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Key mapping capability, if the type registered one
    pub fn translator(&self) -> Option<&TranslatorCapability> {
        self.translator.as_ref()
    }

    /// Check if the destination wants a sequence, looking through pointers
    pub fn wants_sequence(&self) -> bool {
        match self.kind {
            TypeKind::Sequence | TypeKind::Array(_) => true,
            TypeKind::Pointer => self.elem().is_some_and(|elem| elem.wants_sequence()),
            _ => false,
        }
    }
}

/// Types that can describe their decode shape
///
/// Schema structs implement this by hand with [`TypeDescriptor::structure`].
pub trait Describe {
    /// Descriptor for this type
    fn describe() -> TypeDescriptor;
}

macro_rules! describe_scalars {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::scalar(std::any::type_name::<$ty>())
                }
            }
        )*
    };
}

describe_scalars!(
    bool, char, String, PathBuf, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64,
);

impl Describe for Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::any("serde_json::Value")
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer::<T>(std::any::type_name::<Self>())
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer::<T>(std::any::type_name::<Self>())
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence::<T>(std::any::type_name::<Self>())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array::<T>(std::any::type_name::<Self>(), N)
    }
}

impl<V: Describe, S> Describe for HashMap<String, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map::<V>(std::any::type_name::<Self>())
    }
}

impl<V: Describe> Describe for BTreeMap<String, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map::<V>(std::any::type_name::<Self>())
    }
}

impl Describe for serde_json::Map<String, Value> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map::<Value>("serde_json::Map")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Legacy;

    impl KeyTranslator for Legacy {
        fn decode_key_mapping(&self) -> KeyMapping {
            KeyMapping::from([("old", "New")])
        }
    }

    #[derive(Default)]
    struct LegacyByRef;

    impl KeyTranslator for Box<LegacyByRef> {
        fn decode_key_mapping(&self) -> KeyMapping {
            KeyMapping::from([("old_ref", "New")])
        }
    }

    #[test]
    fn test_source_kind_of() {
        let cases = vec![
            (json!(null), SourceKind::Null),
            (json!(true), SourceKind::Bool),
            (json!(1.5), SourceKind::Number),
            (json!("x"), SourceKind::String),
            (json!([1, 2]), SourceKind::Sequence),
            (json!({"a": 1}), SourceKind::Map),
        ];

        for (value, expected) in cases {
            assert_eq!(SourceKind::of(&value), expected);
        }
    }

    #[test]
    fn test_builtin_kinds() {
        assert_eq!(String::describe().kind(), TypeKind::Scalar);
        assert_eq!(Value::describe().kind(), TypeKind::Any);
        assert_eq!(Option::<u32>::describe().kind(), TypeKind::Pointer);
        assert_eq!(Box::<u32>::describe().kind(), TypeKind::Pointer);
        assert_eq!(Vec::<u32>::describe().kind(), TypeKind::Sequence);
        assert_eq!(<[u8; 4]>::describe().kind(), TypeKind::Array(4));
        assert_eq!(HashMap::<String, u8>::describe().kind(), TypeKind::Map);
        assert_eq!(BTreeMap::<String, u8>::describe().kind(), TypeKind::Map);
    }

    #[test]
    fn test_pointer_elem() {
        let desc = Option::<Vec<String>>::describe();
        let elem = desc.elem().expect("pointer has elem");
        assert_eq!(elem.kind(), TypeKind::Sequence);
        assert_eq!(elem.elem().map(|e| e.kind()), Some(TypeKind::Scalar));
        assert!(String::describe().elem().is_none());
    }

    #[test]
    fn test_wants_sequence() {
        assert!(Vec::<u8>::describe().wants_sequence());
        assert!(<[u8; 2]>::describe().wants_sequence());
        assert!(Option::<Vec<u8>>::describe().wants_sequence());
        assert!(Option::<Box<[u8; 2]>>::describe().wants_sequence());
        assert!(!Option::<u8>::describe().wants_sequence());
        assert!(!TypeDescriptor::structure("S").wants_sequence());
    }

    #[test]
    fn test_structure_fields() {
        let desc = TypeDescriptor::structure("Server")
            .field::<String>("Host")
            .field::<Option<u16>>("Port");

        let names: Vec<_> = desc.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Host", "Port"]);
        assert_eq!(desc.fields()[1].descriptor().kind(), TypeKind::Pointer);
        assert!(desc.translator().is_none());
    }

    #[test]
    fn test_translator_forms() {
        let by_value = TypeDescriptor::structure("Legacy").translate_keys::<Legacy>();
        let cap = by_value.translator().expect("capability");
        assert_eq!(cap.form(), TranslatorForm::Value);
        assert_eq!(cap.key_mapping().canonical("old"), Some("New"));

        let by_ref = TypeDescriptor::structure("LegacyByRef").translate_keys_by_ref::<LegacyByRef>();
        let cap = by_ref.translator().expect("capability");
        assert_eq!(cap.form(), TranslatorForm::Pointer);
        assert_eq!(cap.key_mapping().canonical("old_ref"), Some("New"));
    }
}
