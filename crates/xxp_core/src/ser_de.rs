//! Serialization and deserialization of serde types.
//!
//! The bytes are identical to encoding the equivalent [crate::Value]:
//! structs and tuple structs are records, tuples and `[T; N]` are arrays,
//! `Vec<T>` and byte buffers are lists, maps are maps and newtype structs
//! are transparent. Anything else is rejected with
//! [crate::Error::UnsupportedShape].

mod de;
mod ser;

pub use de::XxpDeserializer;
pub use ser::{Compound, XxpSerializer};

use crate::byte_order::ByteOrder;
use crate::config::CodecConfig;
use crate::err::Result;

/// Serialize a data structure to a vector of bytes
pub fn to_bytes<T, O>(value: &T, order: O) -> Result<Vec<u8>>
where
    T: serde::Serialize + ?Sized,
    O: ByteOrder,
{
    to_bytes_with(value, order, CodecConfig::default())
}

/// Serialize a data structure to a vector of bytes, with custom limits
pub fn to_bytes_with<T, O>(value: &T, order: O, config: CodecConfig) -> Result<Vec<u8>>
where
    T: serde::Serialize + ?Sized,
    O: ByteOrder,
{
    let mut serializer = XxpSerializer::new(order, config);
    value.serialize(&mut serializer)?;

    let bytes = serializer.into_buffer().into_vec();
    log::debug!("serialized {} bytes", bytes.len());

    Ok(bytes)
}

/// Deserialize a data structure from a byte-exact slice of bytes
pub fn from_bytes<'de, T, O>(bytes: &'de [u8], order: O) -> Result<T>
where
    T: serde::Deserialize<'de>,
    O: ByteOrder,
{
    from_bytes_with(bytes, order, CodecConfig::default())
}

/// Deserialize a data structure from a byte-exact slice of bytes, with custom limits
pub fn from_bytes_with<'de, T, O>(bytes: &'de [u8], order: O, config: CodecConfig) -> Result<T>
where
    T: serde::Deserialize<'de>,
    O: ByteOrder,
{
    let mut deserializer = XxpDeserializer::from_slice(bytes, order, config);

    let value = T::deserialize(&mut deserializer)?;
    deserializer.finish()?;

    Ok(value)
}

/// Serializing and deserializing tests
#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::fmt::Debug;

    use super::*;
    use crate::byte_order::{BigEndian, LittleEndian};
    use crate::codec;
    use crate::err::Error;
    use crate::shape::Shape;
    use crate::value::{RecordValue, Value};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Ts {
        #[serde(rename = "Id")]
        id: u32,
        #[serde(rename = "Name")]
        name: String,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Everyone {
        id: u32,
        name: String,
        m: BTreeMap<u32, String>,
        points: Vec<(i16, i16)>,
        #[serde(with = "serde_bytes")]
        blob: Vec<u8>,
        pos: Position,
        tag: Tag,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Position(i64, i64);

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Tag(u8);

    /// Performs a ser-de process under both byte orders
    fn ser_de_loop<T: Debug + PartialEq + Serialize + for<'a> Deserialize<'a>>(input: T) {
        let _ = pretty_env_logger::try_init();

        let big = to_bytes(&input, BigEndian).unwrap();
        let little = to_bytes(&input, LittleEndian).unwrap();
        log::debug!("bytes: {} - {:?}", big.len(), big);

        assert_eq!(big.len(), little.len());
        assert_eq!(from_bytes::<T, _>(&big, BigEndian).unwrap(), input);
        assert_eq!(from_bytes::<T, _>(&little, LittleEndian).unwrap(), input);
    }

    #[test]
    fn test_ser_de_struct() {
        let s = Ts {
            id: 7758,
            name: "Allen".to_string(),
        };

        let bytes = to_bytes(&s, BigEndian).unwrap();
        assert_eq!(
            bytes,
            [
                0x00, 0x00, 0x1E, 0x4E, 0, 0, 0, 0, 0, 0, 0, 5, 0x41, 0x6C, 0x6C, 0x65, 0x6E
            ]
        );

        ser_de_loop(s);
    }

    #[test]
    fn test_ser_de_map() {
        let map: HashMap<String, i32> = HashMap::from([
            ("asd".to_string(), 10_000),
            ("how about that 👏👏👏".to_string(), 69),
        ]);

        ser_de_loop(map);
    }

    /// Testing ser_de of sequences, like vectors and tuples
    #[test]
    fn test_ser_de_seq() {
        ser_de_loop(vec![100, 200, 300, 400]);
        ser_de_loop((12_u8, 100_i64, 20000_u16));
        ser_de_loop([7_u64; 5]);
        ser_de_loop(Vec::<String>::new());
    }

    #[test]
    fn test_ser_de_nested() {
        ser_de_loop(Everyone {
            id: 123,
            name: "Allen".to_string(),
            m: BTreeMap::from([(1, "Allen".to_string()), (2, "Alice".to_string())]),
            points: vec![(-1, 1), (i16::MIN, i16::MAX)],
            blob: vec![0, 1, 2, 255],
            pos: Position(-40, 40),
            tag: Tag(9),
        });
    }

    /// The serde front-end and the value codec share one wire format
    #[test]
    fn test_matches_value_codec() {
        let m = BTreeMap::from([(1_u32, "Allen".to_string()), (2, "Alice".to_string())]);
        let from_serde = to_bytes(&m, LittleEndian).unwrap();

        let value = Value::map(
            Shape::U32,
            Shape::String,
            [(1_u32.into(), "Allen".into()), (2_u32.into(), "Alice".into())],
        );
        assert_eq!(from_serde, codec::encode(&value, LittleEndian).unwrap());

        // tuple structs are records, tuples are arrays
        let record: Value = RecordValue::new("Position")
            .with_field("0", -40_i64)
            .with_field("1", 40_i64)
            .into();
        assert_eq!(
            to_bytes(&Position(-40, 40), BigEndian).unwrap(),
            codec::encode(&record, BigEndian).unwrap()
        );

        let array = Value::array(Shape::I16, [Value::I16(-1), Value::I16(1)]);
        assert_eq!(
            to_bytes(&(-1_i16, 1_i16), BigEndian).unwrap(),
            codec::encode(&array, BigEndian).unwrap()
        );

        // byte buffers are lists of u8
        let bytes = serde_bytes::ByteBuf::from(vec![1_u8, 2, 3]);
        let list = Value::list(Shape::U8, [1_u8.into(), 2_u8.into(), 3_u8.into()]);
        assert_eq!(
            to_bytes(&bytes, BigEndian).unwrap(),
            codec::encode(&list, BigEndian).unwrap()
        );
    }

    /// Sequences of unknown length get their count patched in afterwards
    #[test]
    fn test_unknown_length_seq() {
        struct Evens(u8);

        impl Serialize for Evens {
            fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.collect_seq((0..self.0).filter(|n| n % 2 == 0))
            }
        }

        let bytes = to_bytes(&Evens(7), BigEndian).unwrap();
        assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 4, 0, 2, 4, 6]);

        let evens: Vec<u8> = from_bytes(&bytes, BigEndian).unwrap();
        assert_eq!(evens, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_ser_de_unsupported() {
        #[derive(Debug, Serialize, Deserialize)]
        enum E {
            This,
            That(bool),
        }

        #[derive(Debug, Serialize, Deserialize)]
        struct WithFloat {
            id: u8,
            ratio: f32,
        }

        assert_eq!(
            to_bytes(&E::This, BigEndian),
            Err(Error::UnsupportedShape("enum".to_owned()))
        );
        assert_eq!(
            to_bytes(&E::That(true), BigEndian),
            Err(Error::UnsupportedShape("enum".to_owned()))
        );
        assert_eq!(
            to_bytes(&Some(1_u8), BigEndian),
            Err(Error::UnsupportedShape("option".to_owned()))
        );
        assert_eq!(
            to_bytes(&WithFloat { id: 1, ratio: 0.5 }, BigEndian),
            Err(Error::UnsupportedShape("f32".to_owned()))
        );

        // the id is read, the float field is refused before consuming anything
        let bytes = [1_u8, 0, 0, 0, 0];
        let mut de = XxpDeserializer::from_slice(&bytes, BigEndian, CodecConfig::default());
        let err = WithFloat::deserialize(&mut de).unwrap_err();
        assert_eq!(err, Error::UnsupportedShape("f32".to_owned()));
        assert_eq!(de.finish(), Err(Error::TrailingBytes(4)));

        assert_eq!(
            from_bytes::<E, _>(&[0], BigEndian).unwrap_err(),
            Error::UnsupportedShape("enum E".to_owned())
        );
        assert_eq!(
            from_bytes::<bool, _>(&[1], BigEndian).unwrap_err(),
            Error::UnsupportedShape("bool".to_owned())
        );
        // 128-bit integers have no fixed-width rule
        assert_eq!(
            to_bytes(&1_i128, BigEndian),
            Err(Error::UnsupportedShape("i128".to_owned()))
        );
        assert_eq!(
            to_bytes(&1_u128, LittleEndian),
            Err(Error::UnsupportedShape("u128".to_owned()))
        );
        assert_eq!(
            from_bytes::<i128, _>(&[0; 16], BigEndian),
            Err(Error::UnsupportedShape("i128".to_owned()))
        );
        assert_eq!(
            from_bytes::<u128, _>(&[0; 16], BigEndian),
            Err(Error::UnsupportedShape("u128".to_owned()))
        );
    }

    #[test]
    fn test_truncated() {
        let bytes = to_bytes(
            &Ts {
                id: 1,
                name: "Alice".to_string(),
            },
            BigEndian,
        )
        .unwrap();

        for end in 0..bytes.len() {
            assert!(matches!(
                from_bytes::<Ts, _>(&bytes[..end], BigEndian),
                Err(Error::TruncatedInput { .. })
            ));
        }
    }

    #[test]
    fn test_tuple_length_checked() {
        let bytes = to_bytes(&vec![1_u8, 2, 3], BigEndian).unwrap();

        assert!(matches!(
            from_bytes::<(u8, u8), _>(&bytes, BigEndian),
            Err(Error::ShapeMismatch { .. })
        ));
        assert_eq!(from_bytes::<[u8; 3], _>(&bytes, BigEndian).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_borrowed_str() {
        #[derive(Deserialize)]
        struct Borrowed<'a> {
            name: &'a str,
        }

        let bytes = to_bytes("borrowed", LittleEndian).unwrap();
        let b: Borrowed = from_bytes(&bytes, LittleEndian).unwrap();
        assert_eq!(b.name, "borrowed");
    }

    #[test]
    fn test_depth_limit() {
        let nested = vec![vec![vec![1_u8]]];
        let config = CodecConfig::default().with_max_depth(2);

        assert_eq!(
            to_bytes_with(&nested, BigEndian, config),
            Err(Error::DepthLimitExceeded(2))
        );

        let bytes = to_bytes(&nested, BigEndian).unwrap();
        assert_eq!(
            from_bytes_with::<Vec<Vec<Vec<u8>>>, _>(&bytes, BigEndian, config),
            Err(Error::DepthLimitExceeded(2))
        );
    }

    /// Counts are limited the same way on both sides
    #[test]
    fn test_length_limit() {
        let config = CodecConfig::default().with_max_len(3);
        let too_long = Error::LengthLimitExceeded { len: 4, max: 3 };

        assert_eq!(
            to_bytes_with(&vec![1_u8, 2, 3, 4], BigEndian, config),
            Err(too_long.clone())
        );
        assert_eq!(
            to_bytes_with(&serde_bytes::ByteBuf::from(vec![0; 4]), BigEndian, config),
            Err(too_long.clone())
        );
        assert_eq!(
            to_bytes_with(&BTreeMap::from([(1_u8, 1_u8), (2, 2), (3, 3), (4, 4)]), BigEndian, config),
            Err(too_long.clone())
        );

        // counts only known once the items are written
        struct Evens(u8);

        impl Serialize for Evens {
            fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.collect_seq((0..self.0).filter(|n| n % 2 == 0))
            }
        }
        assert_eq!(to_bytes_with(&Evens(7), BigEndian, config), Err(too_long.clone()));
        assert!(to_bytes_with(&Evens(6), BigEndian, config).is_ok());

        let bytes = to_bytes(&vec![1_u8, 2, 3, 4], BigEndian).unwrap();
        assert_eq!(
            from_bytes_with::<Vec<u8>, _>(&bytes, BigEndian, config),
            Err(too_long.clone())
        );
        assert_eq!(
            from_bytes_with::<serde_bytes::ByteBuf, _>(&bytes, BigEndian, config),
            Err(too_long)
        );

        // strings are bounded by the input, not by the count limit
        let bytes = to_bytes_with("four", BigEndian, config).unwrap();
        assert_eq!(from_bytes_with::<String, _>(&bytes, BigEndian, config).unwrap(), "four");

        // whatever passes the encoder passes a decoder with the same limits
        let bytes = to_bytes_with(&vec![1_u8, 2, 3], BigEndian, config).unwrap();
        assert_eq!(
            from_bytes_with::<Vec<u8>, _>(&bytes, BigEndian, config).unwrap(),
            vec![1, 2, 3]
        );
    }
}
