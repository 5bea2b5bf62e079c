//! Static table descriptions for the managed entities: key strategy, columns, read joins and ordering.

/// Column type as seen by the SQL layer. Drives the placeholder cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Int,
    Date,
}

impl ColumnType {
    pub fn pg_cast(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Int => "int8",
            ColumnType::Date => "date",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty }
}

/// Prefix and zero-padded width of a synthetic id, e.g. `P` + 3 -> `P001`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdFormat {
    pub prefix: &'static str,
    pub width: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    /// Supplied by the caller.
    Natural,
    Synthetic(IdFormat),
    /// Assigned by the store (serial column).
    Serial,
}

/// LEFT JOIN used on read to denormalize a display name.
#[derive(Clone, Copy, Debug)]
pub struct Join {
    pub table: &'static str,
    /// Column on the entity's own table.
    pub local: &'static str,
    /// Column on the joined table.
    pub remote: &'static str,
    /// (joined column, output name)
    pub columns: &'static [(&'static str, &'static str)],
}

#[derive(Clone, Copy, Debug)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

const fn asc(column: &'static str) -> OrderBy {
    OrderBy { column, descending: false }
}

const fn desc(column: &'static str) -> OrderBy {
    OrderBy { column, descending: true }
}

#[derive(Debug)]
pub struct EntitySchema {
    pub table: &'static str,
    pub key: Column,
    pub key_kind: KeyKind,
    /// Non-key columns in insert/select order.
    pub columns: &'static [Column],
    /// Column sets the store keeps unique besides the key.
    pub unique: &'static [&'static str],
    pub joins: &'static [Join],
    pub order: &'static [OrderBy],
}

impl EntitySchema {
    /// Key or non-key column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        if self.key.name == name {
            return Some(&self.key);
        }
        self.columns.iter().find(|c| c.name == name)
    }

    /// Name PostgreSQL gives the primary key constraint of this table.
    pub fn key_constraint(&self) -> String {
        format!("{}_pkey", self.table)
    }

    pub fn unique_constraint(&self, column: &str) -> String {
        format!("{}_{}_key", self.table, column)
    }
}

pub const PRODUCT_ID: IdFormat = IdFormat { prefix: "P", width: 3 };
pub const ADMIN_ID: IdFormat = IdFormat { prefix: "A", width: 2 };
pub const ORDER_ID: IdFormat = IdFormat { prefix: "O", width: 3 };

pub const STUDENT: EntitySchema = EntitySchema {
    table: "student",
    key: col("nim", ColumnType::Text),
    key_kind: KeyKind::Natural,
    columns: &[
        col("nama", ColumnType::Text),
        col("no_telp", ColumnType::Text),
        col("prodi", ColumnType::Text),
    ],
    unique: &[],
    joins: &[],
    order: &[asc("nim")],
};

pub const PRODUCT: EntitySchema = EntitySchema {
    table: "product",
    key: col("produk_id", ColumnType::Text),
    key_kind: KeyKind::Synthetic(PRODUCT_ID),
    columns: &[
        col("vendor_id", ColumnType::Int),
        col("nama_baju", ColumnType::Text),
        col("harga", ColumnType::Int),
        col("stok", ColumnType::Int),
        col("ukuran", ColumnType::Text),
    ],
    unique: &[],
    joins: &[Join {
        table: "vendor",
        local: "vendor_id",
        remote: "vendor_id",
        columns: &[("vendor_nama", "vendor_nama")],
    }],
    order: &[asc("produk_id")],
};

pub const ADMIN: EntitySchema = EntitySchema {
    table: "admin",
    key: col("admin_id", ColumnType::Text),
    key_kind: KeyKind::Synthetic(ADMIN_ID),
    columns: &[
        col("admin_nama", ColumnType::Text),
        col("admin_email", ColumnType::Text),
    ],
    unique: &[],
    joins: &[],
    order: &[asc("admin_id")],
};

pub const PRE_ORDER: EntitySchema = EntitySchema {
    table: "pre_order",
    key: col("order_id", ColumnType::Text),
    key_kind: KeyKind::Synthetic(ORDER_ID),
    columns: &[
        col("produk_id", ColumnType::Text),
        col("nim", ColumnType::Text),
        col("admin_id", ColumnType::Text),
        col("tanggal_order", ColumnType::Date),
        col("status_pembayaran", ColumnType::Text),
    ],
    unique: &[],
    joins: &[
        Join {
            table: "product",
            local: "produk_id",
            remote: "produk_id",
            columns: &[("nama_baju", "nama_baju")],
        },
        Join {
            table: "student",
            local: "nim",
            remote: "nim",
            columns: &[("nama", "mahasiswa_nama")],
        },
        Join {
            table: "admin",
            local: "admin_id",
            remote: "admin_id",
            columns: &[("admin_nama", "admin_nama")],
        },
    ],
    order: &[desc("tanggal_order"), asc("order_id")],
};

pub const INVOICE: EntitySchema = EntitySchema {
    table: "tagihan",
    key: col("tagihan_id", ColumnType::Int),
    key_kind: KeyKind::Serial,
    columns: &[
        col("order_id", ColumnType::Text),
        col("metode_pembayaran", ColumnType::Text),
        col("bukti_pembayaran", ColumnType::Text),
        col("total_amount", ColumnType::Int),
        col("status_pembayaran", ColumnType::Text),
        col("tanggal_tagihan", ColumnType::Date),
    ],
    unique: &["order_id"],
    joins: &[],
    order: &[desc("tanggal_tagihan"), asc("tagihan_id")],
};
