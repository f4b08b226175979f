//! Serde helpers for SurrealDB record ids
//!
//! 全栈统一使用 "table:id" 字符串格式。
//! 反序列化同时兼容 SurrealDB 原生 Thing 格式和 JSON 字符串格式。

use serde::{Deserialize, Deserializer, de};
use std::fmt;
use surrealdb::sql::Thing;

/// 自定义 Visitor：Thing 原生格式或 "table:id" 字符串 → String
struct RecordIdVisitor;

impl<'de> de::Visitor<'de> for RecordIdVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a record id Thing or a string like 'table:id'")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v.to_string())
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v)
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let thing = Thing::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(format!("{}:{}", thing.tb, thing.id))
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let thing = Thing::deserialize(deserializer)?;
        Ok(format!("{}:{}", thing.tb, thing.id))
    }
}

/// Deserialize an optional record id as a "table:id" string
pub fn opt_record_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptVisitor;

    impl<'de> de::Visitor<'de> for OptVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an optional record id")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(RecordIdVisitor).map(Some)
        }
    }

    deserializer.deserialize_option(OptVisitor)
}

/// 默认 true 的布尔字段 (兼容缺省记录)
pub fn default_true() -> bool {
    true
}
