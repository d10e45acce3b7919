//! [`Lead`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contact, deal, lead, Lead},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read::lead::list::Filter,
};

/// Columns of the `leads` table, in the order [`from_row()`] expects them.
const COLUMNS: &str = "\
    id, first_name, last_name, email, phone, \
    corporation_name, incorporation_number, jurisdiction, \
    street, city, postal_code, \
    property_type, ownership_history, marital_status, citizenship_status, \
    occupation, employer_phone, \
    created_at";

/// Converts the provided [`Row`] into a [`Lead`].
fn from_row(row: &Row) -> Lead {
    let corporation = row
        .get::<_, Option<contact::Detail>>("corporation_name")
        .map(|name| contact::Corporation {
            name,
            incorporation_number: row.get("incorporation_number"),
            jurisdiction: row.get("jurisdiction"),
        });
    let address = row
        .get::<_, Option<deal::AddressPart>>("street")
        .map(|street| lead::Address {
            street,
            city: row.get("city"),
            postal_code: row.get("postal_code"),
        });
    Lead {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        corporation,
        address,
        profile: lead::Profile {
            property_type: row.get("property_type"),
            ownership_history: row.get("ownership_history"),
            marital_status: row.get("marital_status"),
            citizenship_status: row.get("citizenship_status"),
            occupation: row.get("occupation"),
            employer_phone: row.get("employer_phone"),
        },
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Lead>, lead::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Lead>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Lead>, lead::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: lead::Id = by.into_inner();

        let sql = format!("SELECT {COLUMNS} FROM leads WHERE id = $1::UUID");
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Lead>, Filter>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Lead>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Lead>, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Filter { search, corporate } = by.into_inner();

        let pattern = search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(LikePattern::contains);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let search_idx = pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM leads \
             WHERE true \
                   {corporate_filtering} \
                   {search_filtering} \
             ORDER BY created_at DESC, id",
            corporate_filtering = corporate.into_iter().format_with(
                "",
                |corporate, f| {
                    let op = if corporate { "IS NOT" } else { "IS" };
                    f(&format_args!("AND corporation_name {op} NULL"))
                },
            ),
            search_filtering =
                search_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND (LOWER(first_name) LIKE ${idx}::VARCHAR \
                              OR LOWER(last_name) LIKE ${idx}::VARCHAR \
                              OR LOWER(email) LIKE ${idx}::VARCHAR \
                              OR LOWER(corporation_name) \
                                 LIKE ${idx}::VARCHAR)",
                    ))
                }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Lead>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(lead): Insert<Lead>,
    ) -> Result<Self::Ok, Self::Err> {
        let Lead {
            id,
            first_name,
            last_name,
            email,
            phone,
            corporation,
            address,
            profile,
            created_at,
        } = lead;

        let (corporation_name, incorporation_number, jurisdiction) =
            corporation.map_or((None, None, None), |c| {
                (Some(c.name), c.incorporation_number, c.jurisdiction)
            });
        let (street, city, postal_code) =
            address.map_or((None, None, None), |a| {
                (Some(a.street), a.city, a.postal_code)
            });

        let sql = format!(
            "INSERT INTO leads ({COLUMNS}) \
             VALUES (\
                 $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, \
                 $6::VARCHAR, $7::VARCHAR, $8::VARCHAR, \
                 $9::VARCHAR, $10::VARCHAR, $11::VARCHAR, \
                 $12::VARCHAR, $13::VARCHAR, $14::VARCHAR, $15::VARCHAR, \
                 $16::VARCHAR, $17::VARCHAR, \
                 $18::TIMESTAMPTZ\
             )",
        );
        self.exec(
            &sql,
            &[
                &id,
                &first_name,
                &last_name,
                &email,
                &phone,
                &corporation_name,
                &incorporation_number,
                &jurisdiction,
                &street,
                &city,
                &postal_code,
                &profile.property_type,
                &profile.ownership_history,
                &profile.marital_status,
                &profile.citizenship_status,
                &profile.occupation,
                &profile.employer_phone,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
