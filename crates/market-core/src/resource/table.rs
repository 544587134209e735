//! Projection tables: which listing fields each operation reads or writes.

/// Read contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadScope {
    /// `GET /listings`
    Collection,
    /// `GET /listings/{id}` and write responses.
    Item,
}

/// Write contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteScope {
    /// `POST /listings`
    Create,
    /// `PUT /listings/{id}`
    Update,
    /// `PUT /listings/{id}/publish`, the only path that touches `isPublished`.
    Publish,
}

/// Readable listing fields. `ShortDescription` and `CreatedAtAgo` are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    Description,
    ShortDescription,
    Price,
    CreatedAtAgo,
    IsPublished,
    Owner,
}

/// A field as exposed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadField {
    pub name: &'static str,
    pub field: Field,
}

/// Where an accepted wire field lands on the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Title,
    /// Raw text, normalized before it becomes the stored description.
    TextDescription,
    Price,
    Owner,
    IsPublished,
}

/// A field as accepted on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteField {
    pub name: &'static str,
    pub target: WriteTarget,
}

const fn read(name: &'static str, field: Field) -> ReadField {
    ReadField { name, field }
}

const fn write(name: &'static str, target: WriteTarget) -> WriteField {
    WriteField { name, target }
}

const BASE_READ_FIELDS: &[ReadField] = &[
    read("title", Field::Title),
    read("description", Field::Description),
    read("shortDescription", Field::ShortDescription),
    read("price", Field::Price),
    read("createdAtAgo", Field::CreatedAtAgo),
    read("isPublished", Field::IsPublished),
    read("owner", Field::Owner),
];

const NO_FIELDS: &[ReadField] = &[];

const ITEM_ONLY_READ_FIELDS: &[ReadField] = &[read("id", Field::Id)];

const GENERAL_WRITE_FIELDS: &[WriteField] = &[
    write("title", WriteTarget::Title),
    write("description", WriteTarget::TextDescription),
    write("price", WriteTarget::Price),
    write("owner", WriteTarget::Owner),
];

const PUBLISH_WRITE_FIELDS: &[WriteField] = &[write("isPublished", WriteTarget::IsPublished)];

/// Ordered read projection for a scope. Item reads prepend the item-only fields.
pub fn read_fields(scope: ReadScope) -> impl Iterator<Item = &'static ReadField> {
    let item_only = match scope {
        ReadScope::Collection => NO_FIELDS,
        ReadScope::Item => ITEM_ONLY_READ_FIELDS,
    };
    item_only.iter().chain(BASE_READ_FIELDS)
}

/// Accepted wire fields for a scope.
pub fn write_fields(scope: WriteScope) -> &'static [WriteField] {
    match scope {
        WriteScope::Create | WriteScope::Update => GENERAL_WRITE_FIELDS,
        WriteScope::Publish => PUBLISH_WRITE_FIELDS,
    }
}
