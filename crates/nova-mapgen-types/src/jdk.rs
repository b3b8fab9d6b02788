//! Minimal JDK declarations: `java.lang` basics, the collection hierarchy and the handful of
//! `java.util`/`java.text` types the built-in conversions refer to.

use crate::decl::ClassDecl;
use crate::PrimitiveType;

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";
pub const CLASS: &str = "java.lang.Class";
pub const ENUM: &str = "java.lang.Enum";
pub const NUMBER: &str = "java.lang.Number";
pub const ITERABLE: &str = "java.lang.Iterable";
pub const COLLECTION: &str = "java.util.Collection";
pub const LIST: &str = "java.util.List";
pub const ARRAY_LIST: &str = "java.util.ArrayList";
pub const SET: &str = "java.util.Set";
pub const LINKED_HASH_SET: &str = "java.util.LinkedHashSet";
pub const ENUM_SET: &str = "java.util.EnumSet";
pub const MAP: &str = "java.util.Map";
pub const LINKED_HASH_MAP: &str = "java.util.LinkedHashMap";
pub const DATE: &str = "java.util.Date";
pub const CALENDAR: &str = "java.util.Calendar";
pub const GREGORIAN_CALENDAR: &str = "java.util.GregorianCalendar";
pub const SIMPLE_DATE_FORMAT: &str = "java.text.SimpleDateFormat";
pub const PARSE_EXCEPTION: &str = "java.text.ParseException";

/// Abstract collection/map types and the concrete type instantiated in their place.
pub const DEFAULT_IMPLEMENTATIONS: &[(&str, &str)] = &[
    (ITERABLE, ARRAY_LIST),
    (COLLECTION, ARRAY_LIST),
    (LIST, ARRAY_LIST),
    (SET, LINKED_HASH_SET),
    ("java.util.SortedSet", "java.util.TreeSet"),
    ("java.util.NavigableSet", "java.util.TreeSet"),
    (MAP, LINKED_HASH_MAP),
    ("java.util.SortedMap", "java.util.TreeMap"),
    ("java.util.NavigableMap", "java.util.TreeMap"),
    (
        "java.util.concurrent.ConcurrentMap",
        "java.util.concurrent.ConcurrentHashMap",
    ),
    (
        "java.util.concurrent.ConcurrentNavigableMap",
        "java.util.concurrent.ConcurrentSkipListMap",
    ),
];

pub fn default_implementation(name: &str) -> Option<&'static str> {
    DEFAULT_IMPLEMENTATIONS
        .iter()
        .find(|(declared, _)| *declared == name)
        .map(|(_, implementation)| *implementation)
}

pub fn declarations() -> Vec<ClassDecl> {
    let mut out = vec![
        ClassDecl::class(OBJECT),
        ClassDecl::class(STRING).immutable(),
        ClassDecl::class(CLASS)
            .with_type_params(["T"])
            .without_default_constructor(),
        ClassDecl::abstract_class(ENUM).with_type_params(["E"]),
        ClassDecl::abstract_class(NUMBER),
        ClassDecl::class("java.lang.Exception"),
        ClassDecl::class(PARSE_EXCEPTION).extends("java.lang.Exception"),
        ClassDecl::class("java.math.BigDecimal")
            .extends(NUMBER)
            .immutable()
            .without_default_constructor(),
        ClassDecl::class(DATE),
        ClassDecl::abstract_class(CALENDAR),
        ClassDecl::class(GREGORIAN_CALENDAR).extends(CALENDAR),
        ClassDecl::class(SIMPLE_DATE_FORMAT),
        // Collections.
        ClassDecl::interface(ITERABLE).with_type_params(["T"]),
        ClassDecl::interface(COLLECTION)
            .with_type_params(["E"])
            .extends("java.lang.Iterable<E>"),
        ClassDecl::interface(LIST)
            .with_type_params(["E"])
            .extends("java.util.Collection<E>"),
        ClassDecl::class(ARRAY_LIST)
            .with_type_params(["E"])
            .extends("java.util.List<E>"),
        ClassDecl::class("java.util.LinkedList")
            .with_type_params(["E"])
            .extends("java.util.List<E>"),
        ClassDecl::interface(SET)
            .with_type_params(["E"])
            .extends("java.util.Collection<E>"),
        ClassDecl::interface("java.util.SortedSet")
            .with_type_params(["E"])
            .extends("java.util.Set<E>"),
        ClassDecl::interface("java.util.NavigableSet")
            .with_type_params(["E"])
            .extends("java.util.SortedSet<E>"),
        ClassDecl::class("java.util.HashSet")
            .with_type_params(["E"])
            .extends("java.util.Set<E>"),
        ClassDecl::class(LINKED_HASH_SET)
            .with_type_params(["E"])
            .extends("java.util.HashSet<E>"),
        ClassDecl::class("java.util.TreeSet")
            .with_type_params(["E"])
            .extends("java.util.NavigableSet<E>"),
        ClassDecl::abstract_class(ENUM_SET)
            .with_type_params(["E"])
            .extends("java.util.Set<E>")
            .without_default_constructor(),
        // Maps.
        ClassDecl::interface(MAP).with_type_params(["K", "V"]),
        ClassDecl::interface("java.util.SortedMap")
            .with_type_params(["K", "V"])
            .extends("java.util.Map<K, V>"),
        ClassDecl::interface("java.util.NavigableMap")
            .with_type_params(["K", "V"])
            .extends("java.util.SortedMap<K, V>"),
        ClassDecl::class("java.util.HashMap")
            .with_type_params(["K", "V"])
            .extends("java.util.Map<K, V>"),
        ClassDecl::class(LINKED_HASH_MAP)
            .with_type_params(["K", "V"])
            .extends("java.util.HashMap<K, V>"),
        ClassDecl::class("java.util.TreeMap")
            .with_type_params(["K", "V"])
            .extends("java.util.NavigableMap<K, V>"),
        ClassDecl::interface("java.util.concurrent.ConcurrentMap")
            .with_type_params(["K", "V"])
            .extends("java.util.Map<K, V>"),
        ClassDecl::interface("java.util.concurrent.ConcurrentNavigableMap")
            .with_type_params(["K", "V"])
            .extends("java.util.concurrent.ConcurrentMap<K, V>")
            .extends("java.util.NavigableMap<K, V>"),
        ClassDecl::class("java.util.concurrent.ConcurrentHashMap")
            .with_type_params(["K", "V"])
            .extends("java.util.concurrent.ConcurrentMap<K, V>"),
        ClassDecl::class("java.util.concurrent.ConcurrentSkipListMap")
            .with_type_params(["K", "V"])
            .extends("java.util.concurrent.ConcurrentNavigableMap<K, V>"),
    ];

    for primitive in PrimitiveType::ALL {
        let boxed = ClassDecl::class(primitive.boxed_name())
            .immutable()
            .without_default_constructor();
        let boxed = match primitive {
            PrimitiveType::Boolean | PrimitiveType::Char => boxed,
            _ => boxed.extends(NUMBER),
        };
        out.push(boxed);
    }

    out
}
