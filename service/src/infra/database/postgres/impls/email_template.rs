//! [`EmailTemplate`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::EmailTemplate,
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read::email_template::list::{Order, Selector},
};

/// Converts the provided [`Row`] into an [`EmailTemplate`].
fn from_row(row: &Row) -> EmailTemplate {
    EmailTemplate {
        id: row.get("id"),
        name: row.get("name"),
        body: row.get("body"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Vec<EmailTemplate>, Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<EmailTemplate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<EmailTemplate>, Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Selector { order, search } = by.into_inner();

        let pattern = search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(LikePattern::contains);
        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let search_filtering = pattern.as_ref().map_or(String::new(), |p| {
            ps.push(p);
            format!("AND LOWER(name) LIKE ${}::VARCHAR", ps.len())
        });
        let ordering = match order {
            Order::NewestFirst => "ORDER BY created_at DESC",
            Order::Unordered => "",
        };

        let sql = format!(
            "SELECT id, name, body, is_active, created_at \
             FROM email_templates \
             WHERE true \
                   {search_filtering} \
             {ordering}",
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

impl<C> Database<Insert<EmailTemplate>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(template): Insert<EmailTemplate>,
    ) -> Result<Self::Ok, Self::Err> {
        let EmailTemplate {
            id,
            name,
            body,
            is_active,
            created_at,
        } = template;

        const SQL: &str = "\
            INSERT INTO email_templates (\
                id, name, body, is_active, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::TEXT, $4::BOOLEAN, $5::TIMESTAMPTZ\
            )";
        self.exec(SQL, &[&id, &name, &body, &is_active, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
