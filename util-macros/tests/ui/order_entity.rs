use util_domain::entity::Entity;
use util_domain::value_object::VersionToken;
use util_macros::{entity, entity_id};
use uuid::Uuid;

#[entity_id]
struct OrderId(Uuid);

// 用户自带的 derive 与宏派生合并；已声明的 id 字段被移到最前
#[entity(id = OrderId, name = "order")]
#[derive(PartialEq, serde::Serialize)]
struct Order {
    name: String,
    id: OrderId,
    code: String,
}

#[entity]
struct Note {
    text: String,
}

fn main() {
    let raw = Uuid::new_v4();
    let id: OrderId = raw.to_string().parse().unwrap();
    assert_eq!(id, OrderId::from(raw));
    assert_eq!(id.to_string(), raw.to_string());
    assert_eq!(Uuid::from(id.clone()), raw);

    let mut order = Order::new(id.clone());
    order.name = "Name".into();
    order.code = "Code".into();
    assert_eq!(<Order as Entity>::TYPE, "order");
    assert_eq!(order.id(), &id);
    assert!(order.version().is_empty());

    order.set_version(VersionToken::generate());
    let copy = order.clone();
    assert_eq!(copy, order);

    let json = serde_json::to_value(&order).unwrap();
    let fields = json.as_object().unwrap();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields["id"], serde_json::json!(raw.to_string()));

    let note = Note::new("n-1".to_string());
    assert_eq!(<Note as Entity>::TYPE, "Note");
    assert!(note.text.is_empty());
}
