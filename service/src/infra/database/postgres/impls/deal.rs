//! [`Deal`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        contact,
        deal::{self, task, Document, Milestone, Task},
        Deal,
    },
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read::deal::list::{Counts, Filter, Search},
};

/// Converts the provided [`Row`] into a [`Deal`] without its children.
fn deal_from_row(row: &Row) -> Deal {
    let corporation = row
        .get::<_, Option<contact::Detail>>("corporation_name")
        .map(|name| contact::Corporation {
            name,
            incorporation_number: row.get("corporation_incorporation_number"),
            jurisdiction: row.get("corporation_jurisdiction"),
        });
    Deal {
        id: row.get("id"),
        file_number: row.get("file_number"),
        client: deal::Client {
            first_name: row.get("client_first_name"),
            last_name: row.get("client_last_name"),
            email: row.get("client_email"),
            phone: row.get("client_phone"),
            corporation,
        },
        kind: row.get("kind"),
        status: row.get("status"),
        property_address: deal::Address {
            street: row.get("street"),
            unit: row.get("unit"),
            city: row.get("city"),
            province: row.get("province"),
            postal_code: row.get("postal_code"),
        },
        closing_date: row.get("closing_date"),
        opening_date: row.get("opening_date"),
        requisition_date: row.get("requisition_date"),
        price: Money {
            amount: row.get("price_amount"),
            currency: row.get("price_currency"),
        },
        progress: row.get("progress"),
        tasks: vec![],
        milestones: vec![],
        documents: vec![],
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<deal::Id, Deal>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[deal::Id]>,
{
    type Ok = HashMap<deal::Id, Deal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<deal::Id, Deal>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[deal::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const DEALS_SQL: &str = "\
            SELECT id, file_number, kind, status, \
                   client_first_name, client_last_name, \
                   client_email, client_phone, \
                   corporation_name, corporation_incorporation_number, \
                   corporation_jurisdiction, \
                   street, unit, city, province, postal_code, \
                   closing_date, opening_date, requisition_date, \
                   price_amount, price_currency, progress, notes, \
                   created_at \
            FROM deals \
            WHERE id = ANY($1::UUID[])";
        let mut deals = self
            .query(DEALS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let deal = deal_from_row(row);
                (deal.id, deal)
            })
            .collect::<HashMap<_, _>>();
        if deals.is_empty() {
            return Ok(deals);
        }

        const TASKS_SQL: &str = "\
            SELECT deal_id, id, title, completed, status, due_date, \
                   assignee, document_name, document_url, completed_at \
            FROM deal_tasks \
            WHERE deal_id = ANY($1::UUID[]) \
            ORDER BY deal_id, position";
        for row in self
            .query(TASKS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
        {
            let document = row
                .get::<_, Option<String>>("document_name")
                .zip(row.get::<_, Option<String>>("document_url"))
                .map(|(name, url)| task::LinkedDocument { name, url });
            let task = Task {
                id: row.get("id"),
                title: row.get("title"),
                completed: row.get("completed"),
                status: row.get("status"),
                due_date: row.get("due_date"),
                assignee: row.get("assignee"),
                document,
                completed_at: row.get("completed_at"),
            };
            if let Some(d) = deals.get_mut(&row.get::<_, deal::Id>("deal_id"))
            {
                d.tasks.push(task);
            }
        }

        const MILESTONES_SQL: &str = "\
            SELECT deal_id, id, title, status, date, completed_at, \
                   email_sent, email_template \
            FROM deal_milestones \
            WHERE deal_id = ANY($1::UUID[]) \
            ORDER BY deal_id, position";
        for row in self
            .query(MILESTONES_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
        {
            let milestone = Milestone {
                id: row.get("id"),
                title: row.get("title"),
                status: row.get("status"),
                date: row.get("date"),
                completed_at: row.get("completed_at"),
                email_sent: row.get("email_sent"),
                email_template: row.get("email_template"),
            };
            if let Some(d) = deals.get_mut(&row.get::<_, deal::Id>("deal_id"))
            {
                d.milestones.push(milestone);
            }
        }

        const DOCUMENTS_SQL: &str = "\
            SELECT deal_id, id, name, label, status, uploaded_at \
            FROM deal_documents \
            WHERE deal_id = ANY($1::UUID[]) \
            ORDER BY deal_id, uploaded_at";
        for row in self
            .query(DOCUMENTS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
        {
            let document = Document {
                id: row.get("id"),
                name: row.get("name"),
                label: row.get("label"),
                status: row.get("status"),
                uploaded_at: row.get("uploaded_at"),
            };
            if let Some(d) = deals.get_mut(&row.get::<_, deal::Id>("deal_id"))
            {
                d.documents.push(document);
            }
        }

        Ok(deals)
    }
}

impl<C> Database<Select<By<Option<Deal>, deal::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<deal::Id, Deal>, [deal::Id; 1]>>,
        Ok = HashMap<deal::Id, Deal>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Deal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Deal>, deal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Deal>, Filter>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<deal::Id, Deal>, Vec<deal::Id>>>,
        Ok = HashMap<deal::Id, Deal>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Deal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Deal>, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();

        let limit = filter
            .limit()
            .map(|l| i64::try_from(l).expect("`limit` overflow"));
        let pattern = filter.search.as_ref().and_then(|s| {
            let term = s.term();
            (!term.is_empty()).then(|| (s, LikePattern::contains(&term)))
        });

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let kind_idx = filter.kind.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });
        let status_idx = filter.status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let search_idx = pattern.as_ref().map(|(s, p)| {
            ps.push(p);
            (*s, ps.len())
        });
        let limit_idx = limit.as_ref().map(|l| {
            ps.push(l);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM deals \
             WHERE true \
                   {kind_filtering} \
                   {status_filtering} \
                   {search_filtering} \
             ORDER BY created_at DESC, id \
             {limiting}",
            kind_filtering = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND kind = ${idx}::INT2"))
            }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            search_filtering = search_idx.into_iter().format_with(
                "",
                |(search, idx), f| {
                    let number = format!(
                        "LOWER('#' || file_number) LIKE ${idx}::VARCHAR",
                    );
                    match search {
                        Search::Quick(t) if t.trim().starts_with('#') => {
                            f(&format_args!("AND {number}"))
                        }
                        Search::List(_) => f(&format_args!(
                            "AND (LOWER(file_number) LIKE ${idx}::VARCHAR \
                                  OR LOWER(address) LIKE ${idx}::VARCHAR \
                                  OR LOWER(client_last_name) \
                                     LIKE ${idx}::VARCHAR)",
                        )),
                        Search::Quick(_) => f(&format_args!(
                            "AND ({number} \
                                  OR LOWER(address) LIKE ${idx}::VARCHAR \
                                  OR LOWER(client_last_name) \
                                     LIKE ${idx}::VARCHAR \
                                  OR LOWER(client_first_name) \
                                     LIKE ${idx}::VARCHAR)",
                        )),
                    }
                },
            ),
            limiting = limit_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("LIMIT ${idx}::INT8"))
            }),
        );
        let ids = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<deal::Id>>();

        let mut deals = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.into_iter().filter_map(|id| deals.remove(&id)).collect())
    }
}

impl<C> Database<Select<By<Counts, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Counts;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Counts, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT kind, COUNT(*) AS count \
            FROM deals \
            GROUP BY kind";
        let mut counts = Counts::default();
        for row in self.query(SQL, &[]).await.map_err(tracerr::wrap!())? {
            counts.record(
                row.get("kind"),
                usize::try_from(row.get::<_, i64>("count"))
                    .expect("`count` overflow"),
            );
        }
        Ok(counts)
    }
}

impl<C> Database<Select<By<deal::Serial, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = deal::Serial;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<deal::Serial, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT nextval('deal_serials') AS serial";
        let row = self
            .query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .expect("`nextval()` always returns a row");
        Ok(u32::try_from(row.get::<_, i64>("serial"))
            .expect("`serial` overflow")
            .into())
    }
}

impl<C> Database<Lock<By<Deal, deal::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Deal, deal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: deal::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM deals \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<Deal>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Deal>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(deal): Insert<Deal>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(deal)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Deal>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(deal): Update<Deal>,
    ) -> Result<Self::Ok, Self::Err> {
        let Deal {
            id,
            file_number,
            client,
            kind,
            status,
            property_address,
            closing_date,
            opening_date,
            requisition_date,
            price,
            progress,
            tasks,
            milestones,
            documents,
            notes,
            created_at,
        } = deal;

        let address = property_address.to_string();
        let (corporation_name, incorporation_number, jurisdiction) = client
            .corporation
            .map(|c| (c.name, c.incorporation_number, c.jurisdiction))
            .map_or((None, None, None), |(n, i, j)| (Some(n), i, j));

        const SQL: &str = "\
            INSERT INTO deals (\
                id, file_number, kind, status, \
                client_first_name, client_last_name, \
                client_email, client_phone, \
                corporation_name, corporation_incorporation_number, \
                corporation_jurisdiction, \
                street, unit, city, province, postal_code, address, \
                closing_date, opening_date, requisition_date, \
                price_amount, price_currency, progress, notes, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, $4::INT2, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::VARCHAR, $8::VARCHAR, \
                $9::VARCHAR, $10::VARCHAR, \
                $11::VARCHAR, \
                $12::VARCHAR, $13::VARCHAR, $14::VARCHAR, $15::VARCHAR, \
                $16::VARCHAR, $17::VARCHAR, \
                $18::DATE, $19::DATE, $20::DATE, \
                $21::NUMERIC, $22::INT2, $23::NUMERIC, $24::VARCHAR[], \
                $25::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET file_number = EXCLUDED.file_number, \
                kind = EXCLUDED.kind, \
                status = EXCLUDED.status, \
                client_first_name = EXCLUDED.client_first_name, \
                client_last_name = EXCLUDED.client_last_name, \
                client_email = EXCLUDED.client_email, \
                client_phone = EXCLUDED.client_phone, \
                corporation_name = EXCLUDED.corporation_name, \
                corporation_incorporation_number = \
                    EXCLUDED.corporation_incorporation_number, \
                corporation_jurisdiction = EXCLUDED.corporation_jurisdiction, \
                street = EXCLUDED.street, \
                unit = EXCLUDED.unit, \
                city = EXCLUDED.city, \
                province = EXCLUDED.province, \
                postal_code = EXCLUDED.postal_code, \
                address = EXCLUDED.address, \
                closing_date = EXCLUDED.closing_date, \
                opening_date = EXCLUDED.opening_date, \
                requisition_date = EXCLUDED.requisition_date, \
                price_amount = EXCLUDED.price_amount, \
                price_currency = EXCLUDED.price_currency, \
                progress = EXCLUDED.progress, \
                notes = EXCLUDED.notes, \
                created_at = EXCLUDED.created_at";
        _ = self.exec(
            SQL,
            &[
                &id,
                &file_number,
                &kind,
                &status,
                &client.first_name,
                &client.last_name,
                &client.email,
                &client.phone,
                &corporation_name,
                &incorporation_number,
                &jurisdiction,
                &property_address.street,
                &property_address.unit,
                &property_address.city,
                &property_address.province,
                &property_address.postal_code,
                &address,
                &closing_date,
                &opening_date,
                &requisition_date,
                &price.amount,
                &price.currency,
                &progress,
                &notes,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())?;

        // Children are rewritten as a whole to keep their positions.
        for table in ["deal_tasks", "deal_milestones", "deal_documents"] {
            let sql = format!("DELETE FROM {table} WHERE deal_id = $1::UUID");
            _ = self
                .exec(&sql, &[&id])
                .await
                .map_err(tracerr::wrap!())?;
        }

        const TASK_SQL: &str = "\
            INSERT INTO deal_tasks (\
                id, deal_id, position, title, completed, status, due_date, \
                assignee, document_name, document_url, completed_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT4, $4::VARCHAR, $5::BOOLEAN, \
                $6::INT2, $7::DATE, \
                $8::VARCHAR, $9::VARCHAR, $10::VARCHAR, $11::TIMESTAMPTZ\
            )";
        for (position, task) in tasks.into_iter().enumerate() {
            let position = i32::try_from(position).expect("`position` overflow");
            let (document_name, document_url) =
                task.document.map(|d| (d.name, d.url)).unzip();
            _ = self
                .exec(
                    TASK_SQL,
                    &[
                        &task.id,
                        &id,
                        &position,
                        &task.title,
                        &task.completed,
                        &task.status,
                        &task.due_date,
                        &task.assignee,
                        &document_name,
                        &document_url,
                        &task.completed_at,
                    ],
                )
                .await
                .map_err(tracerr::wrap!())?;
        }

        const MILESTONE_SQL: &str = "\
            INSERT INTO deal_milestones (\
                id, deal_id, position, title, status, date, completed_at, \
                email_sent, email_template\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT4, $4::VARCHAR, $5::INT2, \
                $6::DATE, $7::TIMESTAMPTZ, $8::BOOLEAN, $9::VARCHAR\
            )";
        for (position, milestone) in milestones.into_iter().enumerate() {
            let position = i32::try_from(position).expect("`position` overflow");
            _ = self
                .exec(
                    MILESTONE_SQL,
                    &[
                        &milestone.id,
                        &id,
                        &position,
                        &milestone.title,
                        &milestone.status,
                        &milestone.date,
                        &milestone.completed_at,
                        &milestone.email_sent,
                        &milestone.email_template,
                    ],
                )
                .await
                .map_err(tracerr::wrap!())?;
        }

        const DOCUMENT_SQL: &str = "\
            INSERT INTO deal_documents (\
                id, deal_id, name, label, status, uploaded_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::VARCHAR, $5::INT2, \
                $6::TIMESTAMPTZ\
            )";
        for document in documents {
            _ = self
                .exec(
                    DOCUMENT_SQL,
                    &[
                        &document.id,
                        &id,
                        &document.name,
                        &document.label,
                        &document.status,
                        &document.uploaded_at,
                    ],
                )
                .await
                .map_err(tracerr::wrap!())?;
        }

        Ok(())
    }
}
