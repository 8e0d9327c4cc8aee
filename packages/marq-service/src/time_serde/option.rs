use serde::{Deserialize, Deserializer, Serializer, de};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match value {
		Some(value) => {
			let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

			serializer.serialize_some(&text)
		},
		None => serializer.serialize_none(),
	}
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	let text = Option::<String>::deserialize(deserializer)?;

	text.map(|text| OffsetDateTime::parse(&text, &Rfc3339).map_err(de::Error::custom))
		.transpose()
}
