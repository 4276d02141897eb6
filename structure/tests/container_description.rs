//! Container descriptions on their own and combined through dispatch.

mod common;

use std::sync::Arc;

use common::{
    Address, Contact, Group, LandlineNumber, MobileNumber, PhoneNumber, address, contact,
    init_logging,
};
use structedit::undo::CommandQueue;
use structedit::{
    ContainerDescription, NodeEditor, Shared, StructureEditor, TargetContainerInject, upcast,
};

fn alice() -> Shared<Contact> {
    Shared::new(Contact {
        name: "Alice".into(),
        home_address: Some(address("1 Elm Street", "Springfield")),
        work_address: None,
        phone_numbers: vec![
            PhoneNumber::Mobile(Shared::new(MobileNumber::default())),
            PhoneNumber::Landline(Shared::new(LandlineNumber::default())),
        ],
    })
}

// ============================================================================
// Standalone descriptions
// ============================================================================

#[test]
fn empty_contact_then_address_and_landline() {
    let contact = Shared::new(Contact::default());
    let description = common::contact_description();
    let names = |contact: &Shared<Contact>| -> Vec<String> {
        description
            .candidates_for(contact)
            .iter()
            .map(|c| c.node_type().to_string())
            .collect()
    };

    let before = names(&contact);
    assert_eq!(
        before,
        vec![
            "Home Address",
            "Work Address",
            "Landline Number",
            "Mobile Number"
        ]
    );
    assert!(description.nodes_in(&contact).is_empty());

    let home = address("1 Elm Street", "Springfield");
    let landline = Shared::new(LandlineNumber {
        number: "555-0100".into(),
    });
    contact.write().home_address = Some(home.clone());
    contact
        .write()
        .phone_numbers
        .push(PhoneNumber::Landline(landline.clone()));

    let nodes = description.nodes_in(&contact);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].node_type(), "Home Address");
    assert!(home.is_target(nodes[0].target()));
    assert_eq!(nodes[1].node_type(), "Landline Number");
    assert!(landline.is_target(nodes[1].target()));
    assert_eq!(names(&contact), before);
}

#[test]
fn nodes_follow_description_order_then_list_order() {
    let contact = alice();
    let description = common::contact_description();
    assert_eq!(description.len(), 3);

    let types: Vec<_> = description
        .nodes_in(&contact)
        .iter()
        .map(|n| n.node_type().to_string())
        .collect();
    assert_eq!(types, vec!["Home Address", "Mobile Number", "Landline Number"]);
}

#[test]
fn candidates_do_not_depend_on_contents() {
    let empty = Shared::new(Contact::default());
    let full = alice();
    let description = common::contact_description();
    assert_eq!(description.candidates_for(&empty), description.candidates_for(&full));
    assert_eq!(description.candidates_for(&empty).len(), 4);
}

#[test]
fn first_registered_element_type_wins() {
    let description = ContainerDescription::<Contact>::new().list(
        |c| &mut c.phone_numbers,
        |list| {
            list.element("Primary Mobile", MobileNumber::default)
                .element("Mobile Number", MobileNumber::default)
        },
    );
    let contact = alice();

    let nodes = description.nodes_in(&contact);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].node_type(), "Primary Mobile");

    let names: Vec<_> = description
        .candidates_for(&contact)
        .iter()
        .map(|c| c.node_type().to_string())
        .collect();
    assert_eq!(names, vec!["Primary Mobile", "Mobile Number"]);
}

#[test]
fn list_candidate_appends_to_the_polymorphic_list() {
    let contact = alice();
    let description = common::contact_description();
    let landline = description
        .candidates_for(&contact)
        .into_iter()
        .find(|c| c.node_type() == "Landline Number")
        .unwrap();

    let mut command = landline.create_command();
    let created = command.value().unwrap();
    command.apply().unwrap();
    assert_eq!(command.description(), "Add Landline Number");
    match contact.read().phone_numbers.last() {
        Some(PhoneNumber::Landline(n)) => assert!(n.is_target(&created)),
        other => panic!("unexpected item {other:?}"),
    }

    command.undo().unwrap();
    assert_eq!(contact.read().phone_numbers.len(), 2);
}

#[test]
fn list_element_removal_undoes_in_place() {
    let contact = alice();
    let nodes = common::contact_description().nodes_in(&contact);
    let mobile = &nodes[1];

    let mut remove = mobile.remove_command();
    remove.apply().unwrap();
    assert_eq!(contact.read().phone_numbers.len(), 1);
    remove.undo().unwrap();
    assert!(matches!(
        &contact.read().phone_numbers[0],
        PhoneNumber::Mobile(m) if m.is_target(mobile.target())
    ));
}

// ============================================================================
// Additive dispatch
// ============================================================================

trait HasHome: Send + Sync {
    fn home_mut(&mut self) -> &mut Option<Shared<Address>>;
}

trait HasWork: Send + Sync {
    fn work_mut(&mut self) -> &mut Option<Shared<Address>>;
}

impl HasHome for Contact {
    fn home_mut(&mut self) -> &mut Option<Shared<Address>> {
        &mut self.home_address
    }
}

impl HasWork for Contact {
    fn work_mut(&mut self) -> &mut Option<Shared<Address>> {
        &mut self.work_address
    }
}

fn interface_editor() -> StructureEditor<Contact> {
    init_logging();
    let mut editor = StructureEditor::<Contact>::default();
    editor
        .describe_interface(ContainerDescription::<dyn HasWork>::new().property(
            "Work Address",
            |c| c.work_mut(),
            Address::default,
        ))
        .describe_interface(ContainerDescription::<dyn HasHome>::new().property(
            "Home Address",
            |c| c.home_mut(),
            Address::default,
        ))
        .describe(ContainerDescription::<Contact>::new().list(
            |c| &mut c.phone_numbers,
            |list| list.element("Mobile Number", MobileNumber::default),
        ))
        .implements::<Contact, dyn HasHome>(|c| upcast!(c => dyn HasHome))
        .implements::<Contact, dyn HasWork>(|c| upcast!(c => dyn HasWork));
    editor
}

#[test]
fn every_assignable_description_contributes() {
    let editor = interface_editor();
    let contact = alice();
    contact.write().work_address = Some(address("9 Market Square", "Shelbyville"));

    let types: Vec<_> = editor
        .nodes_in(&contact.target())
        .iter()
        .map(|n| n.node_type().to_string())
        .collect();
    assert_eq!(types, vec!["Work Address", "Home Address", "Mobile Number"]);

    let candidates: Vec<_> = editor
        .candidates_for(&contact.target())
        .iter()
        .map(|c| c.as_ref().map_or("---", |c| c.node_type()).to_string())
        .collect();
    assert_eq!(
        candidates,
        vec!["Work Address", "---", "Home Address", "---", "Mobile Number", "---"]
    );
}

#[test]
fn undeclared_interfaces_do_not_apply() {
    init_logging();
    let mut editor = StructureEditor::<Contact>::default();
    editor.describe_interface(ContainerDescription::<dyn HasHome>::new().property(
        "Home Address",
        |c| c.home_mut(),
        Address::default,
    ));
    assert!(editor.nodes_in(&alice().target()).is_empty());

    editor.implements::<Contact, dyn HasHome>(|c| upcast!(c => dyn HasHome));
    assert_eq!(editor.nodes_in(&alice().target()).len(), 1);
}

#[test]
fn interface_property_writes_through_the_concrete_value() {
    let editor = interface_editor();
    let contact = alice();
    let work = editor
        .candidates_for(&contact.target())
        .into_iter()
        .flatten()
        .find(|c| c.node_type() == "Work Address")
        .unwrap();

    work.create_command().apply().unwrap();
    assert_eq!(contact.read().work_address.as_ref().unwrap().read().city, "");
}

// ============================================================================
// Editors
// ============================================================================

struct AddressEditor {
    target: Shared<Address>,
    contact: Option<Shared<Contact>>,
}

impl NodeEditor<Address> for AddressEditor {
    fn new(target: Shared<Address>, _commands: Arc<CommandQueue>) -> Self {
        Self {
            target,
            contact: None,
        }
    }
}

impl TargetContainerInject<Contact> for AddressEditor {
    fn set_target_container(&mut self, container: Shared<Contact>) {
        self.contact = Some(container);
    }
}

#[test]
fn container_ref_editor_receives_the_owner() {
    let description = ContainerDescription::<Contact>::new()
        .property_container_ref::<Address, AddressEditor>(
            "Home Address",
            |c| &mut c.home_address,
            Address::default,
        );
    let contact = alice();
    let node = description.nodes_in(&contact).remove(0);

    let queue = Arc::new(CommandQueue::new());
    let editor = node
        .create_editor(&queue)
        .downcast::<AddressEditor>()
        .unwrap();
    assert!(editor.target.is_target(node.target()));
    assert!(editor.contact.as_ref().unwrap().ptr_eq(&contact));
}

struct ContactEditor {
    group: Option<Shared<Group>>,
}

impl NodeEditor<Contact> for ContactEditor {
    fn new(_target: Shared<Contact>, _commands: Arc<CommandQueue>) -> Self {
        Self { group: None }
    }
}

impl TargetContainerInject<Group> for ContactEditor {
    fn set_target_container(&mut self, container: Shared<Group>) {
        self.group = Some(container);
    }
}

#[test]
fn list_container_ref_editor_receives_the_list_owner() {
    let description = ContainerDescription::<Group>::new()
        .plain_list_container_ref::<Contact, ContactEditor>(
            "Contact",
            |g| &mut g.contacts,
            Contact::default,
        );
    let group = Shared::new(Group {
        name: "Friends".into(),
        groups: Vec::new(),
        contacts: vec![contact("Erin")],
    });
    let node = description.nodes_in(&group).remove(0);

    let editor = node
        .create_editor(&Arc::new(CommandQueue::new()))
        .downcast::<ContactEditor>()
        .unwrap();
    assert!(editor.group.as_ref().unwrap().ptr_eq(&group));
}

#[cfg(feature = "serialize-json")]
#[test]
fn pinned_format_overrides_settings() {
    use structedit::{EditorSettings, Format};

    init_logging();
    let mut editor = StructureEditor::<Contact>::new(EditorSettings {
        format: Format::Json,
        ..Default::default()
    });
    editor
        .describe(ContainerDescription::<Contact>::new().property(
            "Home Address",
            |c| &mut c.home_address,
            Address::default,
        ))
        .describe(
            ContainerDescription::<Contact>::new()
                .with_format(Format::Ron)
                .property("Work Address", |c| &mut c.work_address, Address::default),
        );
    let contact = alice();
    contact.write().work_address = Some(address("9 Market Square", "Shelbyville"));

    let nodes = editor.nodes_in(&contact.target());
    assert!(nodes[0].serialized().unwrap().starts_with('{'));
    assert!(nodes[1].serialized().unwrap().starts_with('('));
}
