//! Address book fixtures shared by the integration tests.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use structedit::{ContainerDescription, Editable, ElementOf, Shared, StructureEditor, upcast};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
}

impl Editable for Address {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandlineNumber {
    pub number: String,
}

impl Editable for LandlineNumber {
    fn description() -> Option<&'static str> {
        Some("Fixed line")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MobileNumber {
    pub number: String,
    pub sms: bool,
}

impl Editable for MobileNumber {
    fn description() -> Option<&'static str> {
        Some("Cell phone")
    }
}

/// Fax numbers can sit in a contact's phone list but are never described.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaxNumber {
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhoneNumber {
    Landline(Shared<LandlineNumber>),
    Mobile(Shared<MobileNumber>),
    Fax(Shared<FaxNumber>),
}

impl ElementOf<PhoneNumber> for LandlineNumber {
    fn wrap(element: Shared<Self>) -> PhoneNumber {
        PhoneNumber::Landline(element)
    }

    fn unwrap(item: &PhoneNumber) -> Option<Shared<Self>> {
        match item {
            PhoneNumber::Landline(n) => Some(n.clone()),
            _ => None,
        }
    }
}

impl ElementOf<PhoneNumber> for MobileNumber {
    fn wrap(element: Shared<Self>) -> PhoneNumber {
        PhoneNumber::Mobile(element)
    }

    fn unwrap(item: &PhoneNumber) -> Option<Shared<Self>> {
        match item {
            PhoneNumber::Mobile(n) => Some(n.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub home_address: Option<Shared<Address>>,
    pub work_address: Option<Shared<Address>>,
    pub phone_numbers: Vec<PhoneNumber>,
}

impl Editable for Contact {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub groups: Vec<Shared<Group>>,
    pub contacts: Vec<Shared<Contact>>,
}

impl Editable for Group {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressBook {
    pub groups: Vec<Shared<Group>>,
    pub contacts: Vec<Shared<Contact>>,
}

impl Editable for AddressBook {}

/// Anything holding contacts directly.
pub trait ContactContainer: Send + Sync {
    fn contacts_mut(&mut self) -> &mut Vec<Shared<Contact>>;
}

impl ContactContainer for Group {
    fn contacts_mut(&mut self) -> &mut Vec<Shared<Contact>> {
        &mut self.contacts
    }
}

impl ContactContainer for AddressBook {
    fn contacts_mut(&mut self) -> &mut Vec<Shared<Contact>> {
        &mut self.contacts
    }
}

pub fn contact_description() -> ContainerDescription<Contact> {
    ContainerDescription::<Contact>::new()
        .property("Home Address", |c| &mut c.home_address, Address::default)
        .property("Work Address", |c| &mut c.work_address, Address::default)
        .list(
            |c| &mut c.phone_numbers,
            |list| {
                list.element("Landline Number", LandlineNumber::default)
                    .element("Mobile Number", MobileNumber::default)
            },
        )
}

/// Registers every address book description with `editor`.
pub fn describe(editor: &mut StructureEditor<AddressBook>) {
    editor
        .describe_root("Address Book", AddressBook::default)
        .describe(ContainerDescription::<AddressBook>::new().plain_list(
            "Group",
            |b| &mut b.groups,
            Group::default,
        ))
        .describe(ContainerDescription::<Group>::new().plain_list(
            "Group",
            |g| &mut g.groups,
            Group::default,
        ))
        .describe_interface(ContainerDescription::<dyn ContactContainer>::new().plain_list(
            "Contact",
            |c| c.contacts_mut(),
            Contact::default,
        ))
        .implements::<AddressBook, dyn ContactContainer>(|b| upcast!(b => dyn ContactContainer))
        .implements::<Group, dyn ContactContainer>(|g| upcast!(g => dyn ContactContainer))
        .describe(contact_description());
}

/// Routes `log` output to the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn editor() -> StructureEditor<AddressBook> {
    init_logging();
    let mut editor = StructureEditor::default();
    describe(&mut editor);
    editor
}

pub fn address(street: &str, city: &str) -> Shared<Address> {
    Shared::new(Address {
        street: street.into(),
        city: city.into(),
    })
}

pub fn contact(name: &str) -> Shared<Contact> {
    Shared::new(Contact {
        name: name.into(),
        ..Default::default()
    })
}

/// ```text
/// Address Book
/// ├── Group "Family"
/// │   └── Contact "Alice" (home address, landline, mobile)
/// ├── Group "Work"
/// │   ├── Group "Team"
/// │   │   └── Contact "Carol"
/// │   └── Contact "Bob" (work address)
/// └── Contact "Dave"
/// ```
pub fn sample_address_book() -> AddressBook {
    let alice = Shared::new(Contact {
        name: "Alice".into(),
        home_address: Some(address("1 Elm Street", "Springfield")),
        work_address: None,
        phone_numbers: vec![
            PhoneNumber::Landline(Shared::new(LandlineNumber {
                number: "555-0100".into(),
            })),
            PhoneNumber::Mobile(Shared::new(MobileNumber {
                number: "555-0199".into(),
                sms: true,
            })),
        ],
    });
    let bob = Shared::new(Contact {
        name: "Bob".into(),
        work_address: Some(address("9 Market Square", "Shelbyville")),
        ..Default::default()
    });
    let team = Shared::new(Group {
        name: "Team".into(),
        groups: Vec::new(),
        contacts: vec![contact("Carol")],
    });
    AddressBook {
        groups: vec![
            Shared::new(Group {
                name: "Family".into(),
                groups: Vec::new(),
                contacts: vec![alice],
            }),
            Shared::new(Group {
                name: "Work".into(),
                groups: vec![team],
                contacts: vec![bob],
            }),
        ],
        contacts: vec![contact("Dave")],
    }
}

/// A flat book with `groups` groups of `contacts` contacts each.
pub fn generated_address_book(groups: usize, contacts: usize) -> AddressBook {
    AddressBook {
        groups: (0..groups)
            .map(|g| {
                Shared::new(Group {
                    name: format!("Group {g}"),
                    groups: Vec::new(),
                    contacts: (0..contacts)
                        .map(|c| {
                            Shared::new(Contact {
                                name: format!("Contact {g}.{c}"),
                                home_address: Some(address("Main Street", "Springfield")),
                                work_address: None,
                                phone_numbers: vec![PhoneNumber::Mobile(Shared::new(
                                    MobileNumber {
                                        number: format!("555-{g:02}{c:02}"),
                                        sms: false,
                                    },
                                ))],
                            })
                        })
                        .collect(),
                })
            })
            .collect(),
        contacts: Vec::new(),
    }
}
