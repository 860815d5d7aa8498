//! Property-based tests for the wire format.

use std::collections::{BTreeMap, HashMap};

use proptest::prelude::*;
use serde::Serialize;
use xxp::{
    decode, encode, encode_typed, to_bytes, BigEndian, Endian, Error, LittleEndian, Record,
    RecordShape, RecordValue, Shape, Value,
};

/// Strategy for generating arbitrary shapes, a few levels deep
fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::I8),
        Just(Shape::I16),
        Just(Shape::I32),
        Just(Shape::I64),
        Just(Shape::U8),
        Just(Shape::U16),
        Just(Shape::U32),
        Just(Shape::U64),
        Just(Shape::String),
    ];

    leaf.prop_recursive(
        3,  // depth
        24, // size
        4,  // items per collection
        |inner| {
            prop_oneof![
                inner.clone().prop_map(Shape::list),
                (inner.clone(), 0..4_usize).prop_map(|(element, len)| Shape::array(element, len)),
                (inner.clone(), inner.clone()).prop_map(|(key, value)| Shape::map(key, value)),
                prop::collection::vec(inner, 0..4).prop_map(|fields| {
                    let record = fields
                        .into_iter()
                        .enumerate()
                        .fold(RecordShape::new("R"), |record, (idx, shape)| {
                            record.field(format!("f{}", idx), shape)
                        });
                    Shape::Record(record)
                }),
            ]
        },
    )
}

/// Strategy for generating values of the given shape
fn arb_value(shape: &Shape) -> BoxedStrategy<Value> {
    match shape {
        Shape::I8 => any::<i8>().prop_map(Value::I8).boxed(),
        Shape::I16 => any::<i16>().prop_map(Value::I16).boxed(),
        Shape::I32 => any::<i32>().prop_map(Value::I32).boxed(),
        Shape::I64 => any::<i64>().prop_map(Value::I64).boxed(),
        Shape::U8 => any::<u8>().prop_map(Value::U8).boxed(),
        Shape::U16 => any::<u16>().prop_map(Value::U16).boxed(),
        Shape::U32 => any::<u32>().prop_map(Value::U32).boxed(),
        Shape::U64 => any::<u64>().prop_map(Value::U64).boxed(),
        Shape::String => ".{0,12}".prop_map(Value::String).boxed(),

        Shape::Array { element, len } => {
            let shape = (**element).clone();
            prop::collection::vec(arb_value(element), *len)
                .prop_map(move |items| Value::array(shape.clone(), items))
                .boxed()
        }

        Shape::List(element) => {
            let shape = (**element).clone();
            prop::collection::vec(arb_value(element), 0..4)
                .prop_map(move |items| Value::list(shape.clone(), items))
                .boxed()
        }

        Shape::Map { key, value } => {
            let (key_shape, value_shape) = ((**key).clone(), (**value).clone());
            prop::collection::vec((arb_value(key), arb_value(value)), 0..4)
                .prop_map(move |pairs| Value::map(key_shape.clone(), value_shape.clone(), pairs))
                .boxed()
        }

        Shape::Record(record) => {
            let record = record.clone();
            let fields = record
                .fields()
                .iter()
                .map(|field| arb_value(&field.shape))
                .collect::<Vec<_>>();

            fields
                .prop_map(move |values| {
                    let mut value = RecordValue::new(record.name());
                    for (field, v) in record.fields().iter().zip(values) {
                        value.push(field.name.as_str(), v);
                    }
                    Value::Record(value)
                })
                .boxed()
        }
    }
}

fn arb_shaped_value() -> impl Strategy<Value = (Shape, Value)> {
    arb_shape().prop_flat_map(|shape| {
        let value = arb_value(&shape);
        (Just(shape), value)
    })
}

fn arb_endian() -> impl Strategy<Value = Endian> {
    prop_oneof![Just(Endian::Big), Just(Endian::Little)]
}

#[derive(Debug, Clone, PartialEq, Record, Serialize)]
struct Sample {
    id: u64,
    delta: i16,
    name: String,
    points: Vec<[i32; 2]>,
    scores: BTreeMap<u16, i8>,
}

fn arb_sample() -> impl Strategy<Value = Sample> {
    (
        any::<u64>(),
        any::<i16>(),
        ".{0,16}",
        prop::collection::vec(any::<[i32; 2]>(), 0..6),
        prop::collection::btree_map(any::<u16>(), any::<i8>(), 0..6),
    )
        .prop_map(|(id, delta, name, points, scores)| Sample {
            id,
            delta,
            name,
            points,
            scores,
        })
}

/// Reads a big-endian size prefix at `offset`
fn take_size(bytes: &[u8], offset: &mut usize) -> usize {
    let mut prefix = [0_u8; 8];
    prefix.copy_from_slice(&bytes[*offset..*offset + 8]);
    *offset += 8;

    u64::from_be_bytes(prefix) as usize
}

proptest! {
    #[test]
    fn value_roundtrip((shape, value) in arb_shaped_value(), order in arb_endian()) {
        prop_assert_eq!(&value.shape(), &shape);

        let bytes = encode(&value, order).expect("encoding should succeed");
        prop_assert_eq!(bytes.len(), value.encoded_len());

        let decoded = decode(&bytes, order, &shape).expect("decoding should succeed");
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn byte_orders_agree_on_length((_shape, value) in arb_shaped_value()) {
        let big = encode(&value, BigEndian).expect("encoding should succeed");
        let little = encode(&value, LittleEndian).expect("encoding should succeed");

        prop_assert_eq!(big.len(), little.len());
        prop_assert!(decode(&little, LittleEndian, &value.shape()).is_ok());
    }

    #[test]
    fn encoding_is_deterministic(pairs in prop::collection::vec((any::<u32>(), ".{0,8}"), 0..16)) {
        let forward: HashMap<u32, String> = pairs.iter().cloned().collect();
        let sorted: BTreeMap<u32, String> = forward.clone().into_iter().collect();

        let typed = encode_typed(forward.clone(), BigEndian).expect("encoding should succeed");
        prop_assert_eq!(&typed, &encode_typed(sorted.clone(), BigEndian).expect("encoding should succeed"));
        prop_assert_eq!(&typed, &to_bytes(&sorted, BigEndian).expect("encoding should succeed"));
    }

    #[test]
    fn size_prefixes_count_what_follows(items in prop::collection::vec(".{0,8}", 0..8)) {
        let value = Value::list(Shape::String, items.iter().map(|s| Value::from(s.as_str())));
        let bytes = encode(&value, BigEndian).expect("encoding should succeed");

        let mut offset = 0;
        prop_assert_eq!(take_size(&bytes, &mut offset), items.len());
        for item in &items {
            let len = take_size(&bytes, &mut offset);
            prop_assert_eq!(len, item.len());
            offset += len;
        }
        prop_assert_eq!(offset, bytes.len());
    }

    #[test]
    fn truncated_input_is_rejected(
        (shape, value) in arb_shaped_value(),
        order in arb_endian(),
        cut in any::<prop::sample::Index>()
    ) {
        let bytes = encode(&value, order).expect("encoding should succeed");
        prop_assume!(!bytes.is_empty());

        let end = cut.index(bytes.len());
        let result = decode(&bytes[..end], order, &shape);
        prop_assert!(matches!(result, Err(Error::TruncatedInput { .. })), "{:?}", result);
    }

    #[test]
    fn front_ends_agree(sample in arb_sample(), order in arb_endian()) {
        let typed = encode_typed(sample.clone(), order).expect("encoding should succeed");
        let serde = to_bytes(&sample, order).expect("encoding should succeed");

        prop_assert_eq!(typed, serde);
    }
}
