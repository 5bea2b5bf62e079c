//! Closed value sets shared by pre-orders and invoices.

use std::fmt;
use std::str::FromStr;

/// Payment state of a pre-order or invoice. Stored as its display text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    AwaitingVerification,
    Paid,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Unpaid,
        PaymentStatus::AwaitingVerification,
        PaymentStatus::Paid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "Belum Bayar",
            PaymentStatus::AwaitingVerification => "Menunggu Verifikasi",
            PaymentStatus::Paid => "Lunas",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let allowed: Vec<_> = Self::ALL.iter().map(|st| st.as_str()).collect();
                format!("must be one of: {}", allowed.join(", "))
            })
    }
}
